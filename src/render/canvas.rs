use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ImageBuffer, ImageEncoder, Rgb, RgbImage, RgbaImage};

use crate::error::RenderError;
use crate::layout::Rect;

/// Upper bound on surface area. Nine photos at strip widths stay far below
/// this; anything above it is a runaway configuration, not a real strip.
const MAX_SURFACE_PIXELS: u64 = 64_000_000;

/// An owned RGB drawing surface.
///
/// Each composition request allocates its own canvas and publishes it only
/// once the draw pass completes, so consumers never observe a partially
/// painted strip.
#[derive(Clone, Debug)]
pub struct Canvas {
    buffer: RgbImage,
}

impl Canvas {
    /// Allocate a surface filled with `background`.
    ///
    /// Degenerate dimensions and allocations beyond the surface budget are
    /// refused here; the compositor turns that refusal into a diagnostic
    /// placeholder rather than propagating a panic.
    pub fn try_new(width: u32, height: u32, background: [u8; 3]) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::SurfaceUnavailable {
                reason: format!("degenerate canvas {}x{}", width, height),
            });
        }

        if width as u64 * height as u64 > MAX_SURFACE_PIXELS {
            return Err(RenderError::SurfaceUnavailable {
                reason: format!(
                    "{}x{} exceeds the {}MP surface budget",
                    width,
                    height,
                    MAX_SURFACE_PIXELS / 1_000_000
                ),
            });
        }

        Ok(Self {
            buffer: ImageBuffer::from_pixel(width, height, Rgb(background)),
        })
    }

    /// Unchecked constructor for fixed, known-small surfaces (the
    /// diagnostic placeholder). Library callers go through [`try_new`].
    ///
    /// [`try_new`]: Canvas::try_new
    pub(crate) fn filled(width: u32, height: u32, background: [u8; 3]) -> Self {
        Self {
            buffer: ImageBuffer::from_pixel(width, height, Rgb(background)),
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if x < self.width() && y < self.height() {
            self.buffer.put_pixel(x, y, Rgb(color));
        }
    }

    /// Fill a rect, clamped to the canvas bounds.
    pub fn fill_rect(&mut self, rect: &Rect, color: [u8; 3]) {
        let x0 = rect.x.max(0.0) as u32;
        let y0 = rect.y.max(0.0) as u32;
        let x1 = (rect.right().max(0.0) as u32).min(self.width());
        let y1 = (rect.bottom().max(0.0) as u32).min(self.height());

        for y in y0..y1 {
            for x in x0..x1 {
                self.buffer.put_pixel(x, y, Rgb(color));
            }
        }
    }

    /// Copy an opaque tile onto the canvas with its top-left corner at
    /// (`origin_x`, `origin_y`). Out-of-bounds parts are clipped.
    pub fn blit_rgb(&mut self, tile: &RgbImage, origin_x: i64, origin_y: i64) {
        for (tx, ty, pixel) in tile.enumerate_pixels() {
            let x = origin_x + tx as i64;
            let y = origin_y + ty as i64;
            if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
                self.buffer.put_pixel(x as u32, y as u32, *pixel);
            }
        }
    }

    /// Alpha-blend an RGBA tile onto the canvas.
    pub fn blend_rgba(&mut self, tile: &RgbaImage, origin_x: i64, origin_y: i64) {
        for (tx, ty, pixel) in tile.enumerate_pixels() {
            self.blend_pixel(origin_x + tx as i64, origin_y + ty as i64, pixel.0);
        }
    }

    /// Blend one RGBA value over the canvas pixel at (`x`, `y`).
    /// Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }

        let alpha = color[3] as f32 / 255.0;
        if alpha <= 0.0 {
            return;
        }

        let base = self.buffer.get_pixel_mut(x as u32, y as u32);
        if color[3] == 255 {
            base.0 = [color[0], color[1], color[2]];
            return;
        }

        let inv_alpha = 1.0 - alpha;
        for idx in 0..3 {
            base.0[idx] = (color[idx] as f32 * alpha + base.0[idx] as f32 * inv_alpha)
                .round()
                .clamp(0.0, 255.0) as u8;
        }
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Encode the surface as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(
                self.buffer.as_raw(),
                self.width(),
                self.height(),
                image::ColorType::Rgb8,
            )
            .map_err(|e| RenderError::EncodingFailed {
                reason: e.to_string(),
            })?;
        Ok(bytes)
    }

    /// Save the surface as a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_surface_refused() {
        assert!(Canvas::try_new(0, 100, [0, 0, 0]).is_err());
        assert!(Canvas::try_new(100, 0, [0, 0, 0]).is_err());
        assert!(Canvas::try_new(100_000, 100_000, [0, 0, 0]).is_err());
    }

    #[test]
    fn test_background_fill() {
        let canvas = Canvas::try_new(4, 4, [7, 8, 9]).unwrap();
        assert_eq!(canvas.get_pixel(0, 0), [7, 8, 9]);
        assert_eq!(canvas.get_pixel(3, 3), [7, 8, 9]);
    }

    #[test]
    fn test_fill_rect_clamps_to_bounds() {
        let mut canvas = Canvas::try_new(10, 10, [0, 0, 0]).unwrap();
        canvas.fill_rect(&Rect::new(-5.0, -5.0, 100.0, 8.0), [255, 0, 0]);

        assert_eq!(canvas.get_pixel(0, 0), [255, 0, 0]);
        assert_eq!(canvas.get_pixel(9, 2), [255, 0, 0]);
        assert_eq!(canvas.get_pixel(0, 3), [0, 0, 0]);
    }

    #[test]
    fn test_blit_clips() {
        let mut canvas = Canvas::try_new(4, 4, [0, 0, 0]).unwrap();
        let tile = RgbImage::from_pixel(4, 4, Rgb([50, 60, 70]));
        canvas.blit_rgb(&tile, 2, 2);

        assert_eq!(canvas.get_pixel(1, 1), [0, 0, 0]);
        assert_eq!(canvas.get_pixel(2, 2), [50, 60, 70]);
        assert_eq!(canvas.get_pixel(3, 3), [50, 60, 70]);
    }

    #[test]
    fn test_alpha_blend() {
        let mut canvas = Canvas::try_new(1, 1, [0, 0, 0]).unwrap();
        canvas.blend_pixel(0, 0, [255, 255, 255, 128]);

        let px = canvas.get_pixel(0, 0);
        assert!(px[0] > 100 && px[0] < 160, "half-alpha white over black: {:?}", px);

        // Fully transparent leaves the pixel alone.
        let before = canvas.get_pixel(0, 0);
        canvas.blend_pixel(0, 0, [10, 10, 10, 0]);
        assert_eq!(canvas.get_pixel(0, 0), before);
    }

    #[test]
    fn test_png_encoding_is_deterministic() {
        let canvas = Canvas::try_new(16, 16, [1, 2, 3]).unwrap();
        assert_eq!(canvas.encode_png().unwrap(), canvas.encode_png().unwrap());
    }
}
