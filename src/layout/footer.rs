/// The text elements the footer band can hold, in draw order. The watermark
/// is always present and always last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterElement {
    Caption,
    Date,
    Watermark,
}

/// Fraction of the footer height reserved as padding above the first slot
/// and below the last.
const VERTICAL_PADDING_FRACTION: f32 = 0.10;

/// Compute the vertical center of each active footer element.
///
/// The band keeps 10% padding top and bottom; the remainder is divided into
/// equal slots, one per active element. Horizontal centering is uniform
/// (`canvas_width / 2`) and handled by the compositor.
pub fn plan_footer(
    footer_top: f32,
    footer_height: f32,
    caption_active: bool,
    date_active: bool,
) -> Vec<(FooterElement, f32)> {
    let mut elements = Vec::with_capacity(3);
    if caption_active {
        elements.push(FooterElement::Caption);
    }
    if date_active {
        elements.push(FooterElement::Date);
    }
    elements.push(FooterElement::Watermark);

    let padding = footer_height * VERTICAL_PADDING_FRACTION;
    let slot_height = (footer_height - 2.0 * padding) / elements.len() as f32;

    elements
        .into_iter()
        .enumerate()
        .map(|(i, element)| {
            let center = footer_top + padding + (i as f32 + 0.5) * slot_height;
            (element, center)
        })
        .collect()
}
