use image::RgbImage;

use crate::error::Result;
use crate::filters::traits::scale_channel;
use crate::filters::ToneFilter;

const RED_GAIN: f32 = 0.85;
const GREEN_GAIN: f32 = 1.02;
const BLUE_GAIN: f32 = 1.15;

/// Cool color cast, the mirror of [`WarmFilter`](crate::filters::WarmFilter).
pub struct CoolFilter;

impl CoolFilter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoolFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneFilter for CoolFilter {
    fn name(&self) -> &str {
        "cool"
    }

    fn description(&self) -> &str {
        "Cool blue cast with cut reds"
    }

    fn apply(&self, tile: &mut RgbImage) -> Result<()> {
        for pixel in tile.pixels_mut() {
            pixel.0 = [
                scale_channel(pixel.0[0], RED_GAIN),
                scale_channel(pixel.0[1], GREEN_GAIN),
                scale_channel(pixel.0[2], BLUE_GAIN),
            ];
        }
        Ok(())
    }
}
