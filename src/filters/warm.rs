use image::RgbImage;

use crate::error::Result;
use crate::filters::traits::scale_channel;
use crate::filters::ToneFilter;

const RED_GAIN: f32 = 1.15;
const GREEN_GAIN: f32 = 1.05;
const BLUE_GAIN: f32 = 0.85;

/// Warm color cast: lifted reds and greens, cut blues.
pub struct WarmFilter;

impl WarmFilter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WarmFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneFilter for WarmFilter {
    fn name(&self) -> &str {
        "warm"
    }

    fn description(&self) -> &str {
        "Golden-hour cast with lifted reds and cut blues"
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warms_midtones() {
        let mut tile = RgbImage::from_pixel(4, 4, image::Rgb([100, 100, 100]));
        WarmFilter::new().apply(&mut tile).unwrap();

        let px = tile.get_pixel(0, 0);
        assert!(px.0[0] > 100, "red should be lifted");
        assert!(px.0[2] < 100, "blue should be cut");
    }
}
