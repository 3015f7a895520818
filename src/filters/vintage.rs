use image::RgbImage;

use crate::error::Result;
use crate::filters::ToneFilter;

// Classic sepia weights.
const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

// Faded-print lift: blacks come up, highlights come down a touch.
const FADE_LIFT: f32 = 12.0;
const FADE_GAIN: f32 = 0.92;

/// Nostalgic vintage look: sepia tones with a gentle faded lift.
pub struct VintageFilter;

impl VintageFilter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VintageFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneFilter for VintageFilter {
    fn name(&self) -> &str {
        "vintage"
    }

    fn description(&self) -> &str {
        "Sepia tones with a faded-print lift"
    }

    fn apply(&self, tile: &mut RgbImage) -> Result<()> {
        for pixel in tile.pixels_mut() {
            let [r, g, b] = pixel.0;
            let (r, g, b) = (r as f32, g as f32, b as f32);

            pixel.0 = [0, 1, 2].map(|ch| {
                let toned = SEPIA[ch][0] * r + SEPIA[ch][1] * g + SEPIA[ch][2] * b;
                (FADE_LIFT + toned * FADE_GAIN).clamp(0.0, 255.0) as u8
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sepia_orders_channels() {
        let mut tile = RgbImage::from_pixel(2, 2, image::Rgb([90, 120, 160]));
        VintageFilter::new().apply(&mut tile).unwrap();

        // Sepia output always lands red >= green >= blue.
        let px = tile.get_pixel(0, 0);
        assert!(px.0[0] >= px.0[1]);
        assert!(px.0[1] >= px.0[2]);
    }

    #[test]
    fn test_blacks_are_lifted() {
        let mut tile = RgbImage::from_pixel(1, 1, image::Rgb([0, 0, 0]));
        VintageFilter::new().apply(&mut tile).unwrap();
        assert!(tile.get_pixel(0, 0).0[0] > 0);
    }
}
