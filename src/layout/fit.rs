use crate::layout::types::Rect;

/// Where a fitted image lands inside its target rect.
///
/// `offset_x`/`offset_y` are relative to the rect origin; the drawn size is
/// `draw_w` x `draw_h`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub draw_w: f32,
    pub draw_h: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Scale a source uniformly so it is fully visible and centered inside
/// `target` (fit, never crop-fill).
///
/// A source wider than the target scales to the target width and centers
/// vertically; otherwise it scales to the target height and centers
/// horizontally. Equal aspects produce zero offset on both axes. Pure
/// function of its inputs.
pub fn fit_region(source_w: f32, source_h: f32, target: &Rect) -> Placement {
    if source_w <= 0.0 || source_h <= 0.0 || target.width <= 0.0 || target.height <= 0.0 {
        return Placement {
            draw_w: 0.0,
            draw_h: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
    }

    let source_aspect = source_w / source_h;
    let target_aspect = target.width / target.height;

    if source_aspect > target_aspect {
        let draw_w = target.width;
        let draw_h = target.width / source_aspect;
        Placement {
            draw_w,
            draw_h,
            offset_x: 0.0,
            offset_y: (target.height - draw_h) / 2.0,
        }
    } else {
        let draw_h = target.height;
        let draw_w = target.height * source_aspect;
        Placement {
            draw_w,
            draw_h,
            offset_x: (target.width - draw_w) / 2.0,
            offset_y: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn target() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 300.0)
    }

    #[test]
    fn test_matching_aspect_has_no_offset() {
        let p = fit_region(800.0, 600.0, &target());
        assert_relative_eq!(p.offset_x, 0.0);
        assert_relative_eq!(p.offset_y, 0.0);
        assert_relative_eq!(p.draw_w, 400.0);
        assert_relative_eq!(p.draw_h, 300.0);
    }

    #[test]
    fn test_wide_source_letterboxes_vertically() {
        let p = fit_region(1600.0, 600.0, &target());
        assert_relative_eq!(p.draw_w, 400.0);
        assert_relative_eq!(p.draw_h, 150.0);
        assert_relative_eq!(p.offset_x, 0.0);
        assert_relative_eq!(p.offset_y, 75.0);
    }

    #[test]
    fn test_tall_source_letterboxes_horizontally() {
        let p = fit_region(600.0, 1200.0, &target());
        assert_relative_eq!(p.draw_h, 300.0);
        assert_relative_eq!(p.draw_w, 150.0);
        assert_relative_eq!(p.offset_y, 0.0);
        assert_relative_eq!(p.offset_x, 125.0);
    }

    #[test]
    fn test_pure_and_repeatable() {
        let a = fit_region(1234.0, 567.0, &target());
        let b = fit_region(1234.0, 567.0, &target());
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_source_draws_nothing() {
        let p = fit_region(0.0, 100.0, &target());
        assert_eq!(p.draw_w, 0.0);
        assert_eq!(p.draw_h, 0.0);
    }
}
