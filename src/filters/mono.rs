use image::RgbImage;

use crate::error::Result;
use crate::filters::ToneFilter;

/// Black-and-white conversion using Rec. 601 luma weights.
pub struct MonoFilter;

impl MonoFilter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MonoFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneFilter for MonoFilter {
    fn name(&self) -> &str {
        "bw"
    }

    fn description(&self) -> &str {
        "Black-and-white luma conversion"
    }

    fn apply(&self, tile: &mut RgbImage) -> Result<()> {
        for pixel in tile.pixels_mut() {
            let [r, g, b] = pixel.0;
            let luma = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
                .clamp(0.0, 255.0) as u8;
            pixel.0 = [luma, luma, luma];
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_gray() {
        let mut tile = RgbImage::from_pixel(3, 3, image::Rgb([200, 40, 90]));
        MonoFilter::new().apply(&mut tile).unwrap();

        for pixel in tile.pixels() {
            assert_eq!(pixel.0[0], pixel.0[1]);
            assert_eq!(pixel.0[1], pixel.0[2]);
        }
    }
}
