use crate::error::{ConfigError, Result};
use crate::layout::types::{CanvasPlan, Rect};

/// Grid cells are always 4:3 regardless of the source image shape; the
/// aspect-fit pass letterboxes each photo inside its cell.
const CELL_ASPECT: f32 = 4.0 / 3.0;

/// Compute the photo grid for a strip.
///
/// Photos flow left-to-right, top-to-bottom into `columns` columns. The
/// outer margin equals the inter-photo margin, including at zero, where the
/// grid becomes edge-to-edge. An under-full last row is centered
/// horizontally. Canvas height is derived; width and footer height are
/// fixed inputs.
pub fn compute_layout(
    photo_count: usize,
    width: u32,
    margin_px: f32,
    columns: u32,
    footer_height: u32,
) -> Result<CanvasPlan> {
    if photo_count == 0 {
        return Err(ConfigError::InvalidValue {
            key: "photos".to_string(),
            value: "0".to_string(),
        }
        .into());
    }

    let columns = columns as usize;
    let rows = photo_count.div_ceil(columns);

    let canvas_width = width as f32;
    let available_width = canvas_width - 2.0 * margin_px;
    let photo_width = (available_width - margin_px * (columns as f32 - 1.0)) / columns as f32;

    if photo_width <= 0.0 {
        return Err(ConfigError::InvalidValue {
            key: "layout.margin_px".to_string(),
            value: format!("{} leaves no room for photos at width {}", margin_px, width),
        }
        .into());
    }

    let photo_height = photo_width / CELL_ASPECT;

    let grid_height = rows as f32 * photo_height + margin_px * (rows as f32 - 1.0);
    let canvas_height = 2.0 * margin_px + grid_height + footer_height as f32;

    let photos_in_last_row = photo_count - (rows - 1) * columns;
    let last_row_width =
        photos_in_last_row as f32 * photo_width + (photos_in_last_row as f32 - 1.0) * margin_px;

    let mut photo_rects = Vec::with_capacity(photo_count);
    for i in 0..photo_count {
        let row = i / columns;
        let col = i % columns;

        // Center an under-full final row instead of leaving it left-aligned.
        let row_x_offset = if row == rows - 1 && photos_in_last_row < columns {
            (available_width - last_row_width) / 2.0
        } else {
            0.0
        };

        photo_rects.push(Rect::new(
            margin_px + row_x_offset + col as f32 * (photo_width + margin_px),
            margin_px + row as f32 * (photo_height + margin_px),
            photo_width,
            photo_height,
        ));
    }

    Ok(CanvasPlan {
        width,
        height: canvas_height.round() as u32,
        footer_height,
        footer_top: canvas_height - footer_height as f32,
        photo_rects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_count_and_validity() {
        for photo_count in 1..=9 {
            for columns in 1..=4 {
                let plan = compute_layout(photo_count, 480, 12.0, columns, 100).unwrap();
                assert_eq!(plan.photo_rects.len(), photo_count);

                for rect in &plan.photo_rects {
                    assert!(rect.width > 0.0);
                    assert!(rect.height > 0.0);
                }

                for (i, a) in plan.photo_rects.iter().enumerate() {
                    for b in plan.photo_rects.iter().skip(i + 1) {
                        assert!(!a.overlaps(b), "rects overlap: {:?} vs {:?}", a, b);
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_margin_is_edge_to_edge() {
        let plan = compute_layout(4, 480, 0.0, 2, 100).unwrap();

        // Photos butt up against each other within a row.
        let first = plan.photo_rects[0];
        let second = plan.photo_rects[1];
        assert_relative_eq!(second.x, first.x + first.width, epsilon = 1e-3);

        // And against the canvas edges.
        assert_relative_eq!(first.x, 0.0);
        assert_relative_eq!(second.right(), 480.0, epsilon = 1e-3);

        // Height carries no margin contribution: two 4:3 rows plus footer.
        let photo_height: f32 = 240.0 / (4.0 / 3.0);
        assert_eq!(plan.height, (2.0 * photo_height + 100.0).round() as u32);
    }

    #[test]
    fn test_last_row_centering() {
        let plan = compute_layout(5, 480, 10.0, 2, 100).unwrap();
        assert_eq!(plan.photo_rects.len(), 5);

        let available_width = 480.0 - 2.0 * 10.0;
        let photo_width = (available_width - 10.0) / 2.0;

        // Three rows; the lone photo in the last row sits centered, not at
        // the left column position.
        let last = plan.photo_rects[4];
        assert_relative_eq!(
            last.x,
            10.0 + (available_width - photo_width) / 2.0,
            epsilon = 1e-3
        );
        assert!(last.x > plan.photo_rects[0].x);
    }

    #[test]
    fn test_full_rows_not_centered() {
        let plan = compute_layout(4, 480, 10.0, 2, 100).unwrap();
        assert_relative_eq!(plan.photo_rects[0].x, plan.photo_rects[2].x);
        assert_relative_eq!(plan.photo_rects[1].x, plan.photo_rects[3].x);
    }

    #[test]
    fn test_canvas_height_formula() {
        let plan = compute_layout(3, 480, 16.0, 1, 100).unwrap();
        let photo_width = 480.0 - 2.0 * 16.0;
        let photo_height = photo_width / (4.0 / 3.0);
        let expected: f32 = 2.0 * 16.0 + 3.0 * photo_height + 2.0 * 16.0 + 100.0;
        assert_eq!(plan.height, expected.round() as u32);
        assert_relative_eq!(plan.footer_top, expected - 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_zero_photos_rejected() {
        assert!(compute_layout(0, 480, 10.0, 2, 100).is_err());
    }

    #[test]
    fn test_oversized_margin_rejected() {
        // 480 / 2 columns with a 200px margin leaves negative photo width.
        assert!(compute_layout(2, 480, 200.0, 2, 100).is_err());
    }
}
