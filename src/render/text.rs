use rusttype::{point, Font, Scale};

use crate::config::Color;
use crate::render::canvas::Canvas;

const LIGHT_TEXT: Color = Color::new(0xf2, 0xf2, 0xf2);
const DARK_TEXT: Color = Color::new(0x1a, 0x1a, 0x1a);
const LUMINANCE_THRESHOLD: f32 = 0.5;

/// Pick light or dark stamp text for the given background, splitting on
/// Rec. 601 luminance at 0.5. Dark backgrounds get light text.
pub fn stamp_color(background: Color) -> Color {
    if background.luminance() < LUMINANCE_THRESHOLD {
        LIGHT_TEXT
    } else {
        DARK_TEXT
    }
}

/// Advance width of `text` at `scale`.
pub fn text_width(font: &Font, text: &str, scale: Scale) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Rasterize `text` centered on (`center_x`, `center_y`), blending glyph
/// coverage against whatever is already on the canvas. Glyphs falling
/// outside the surface are clipped.
pub fn draw_text_centered(
    canvas: &mut Canvas,
    font: &Font,
    text: &str,
    size: f32,
    center_x: f32,
    center_y: f32,
    color: [u8; 4],
) {
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);

    let origin_x = center_x - text_width(font, text, scale) / 2.0;
    // descent is negative; this puts the ascent/descent box centered on
    // center_y with the baseline where it belongs.
    let baseline = center_y + (v_metrics.ascent + v_metrics.descent) / 2.0;

    let glyphs: Vec<_> = font.layout(text, scale, point(origin_x, baseline)).collect();
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let px = bb.min.x as i64 + gx as i64;
                let py = bb.min.y as i64 + gy as i64;
                let alpha = (coverage * color[3] as f32).round() as u8;
                canvas.blend_pixel(px, py, [color[0], color[1], color[2], alpha]);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_background_gets_light_text() {
        assert_eq!(stamp_color(Color::BLACK), LIGHT_TEXT);
    }

    #[test]
    fn test_white_background_gets_dark_text() {
        assert_eq!(stamp_color(Color::WHITE), DARK_TEXT);
    }

    #[test]
    fn test_mid_gray_lands_dark() {
        // #808080 luminance is just over 0.5.
        assert_eq!(stamp_color(Color::new(0x80, 0x80, 0x80)), DARK_TEXT);
        assert_eq!(stamp_color(Color::new(0x7e, 0x7e, 0x7e)), LIGHT_TEXT);
    }
}
