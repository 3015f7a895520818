use image::RgbImage;

use crate::error::Result;
use crate::filters::ToneFilter;

/// Pass-through filter; photos keep their original colors.
pub struct NormalFilter;

impl NormalFilter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NormalFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneFilter for NormalFilter {
    fn name(&self) -> &str {
        "normal"
    }

    fn description(&self) -> &str {
        "Untouched colors"
    }

    fn apply(&self, _tile: &mut RgbImage) -> Result<()> {
        Ok(())
    }
}
