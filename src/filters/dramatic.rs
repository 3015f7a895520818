use image::RgbImage;

use crate::error::Result;
use crate::filters::ToneFilter;

const CONTRAST: f32 = 1.35;
const SATURATION: f32 = 1.25;

/// High-impact look: contrast stretched around mid-gray, then saturation
/// pushed away from the per-pixel mean.
pub struct DramaticFilter;

impl DramaticFilter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DramaticFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneFilter for DramaticFilter {
    fn name(&self) -> &str {
        "dramatic"
    }

    fn description(&self) -> &str {
        "Boosted contrast and saturation"
    }

    fn apply(&self, tile: &mut RgbImage) -> Result<()> {
        for pixel in tile.pixels_mut() {
            let contrasted = pixel.0.map(|v| (v as f32 - 128.0) * CONTRAST + 128.0);

            let avg = (contrasted[0] + contrasted[1] + contrasted[2]) / 3.0;
            pixel.0 = contrasted.map(|v| (avg + (v - avg) * SATURATION).clamp(0.0, 255.0) as u8);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_spreads_extremes() {
        let mut tile = RgbImage::new(2, 1);
        tile.put_pixel(0, 0, image::Rgb([64, 64, 64]));
        tile.put_pixel(1, 0, image::Rgb([192, 192, 192]));
        DramaticFilter::new().apply(&mut tile).unwrap();

        assert!(tile.get_pixel(0, 0).0[0] < 64);
        assert!(tile.get_pixel(1, 0).0[0] > 192);
    }
}
