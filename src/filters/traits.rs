use image::RgbImage;

use crate::error::Result;

/// Core trait that all tone filters implement.
///
/// Implementations must be deterministic: applying the same filter to the
/// same tile always yields the same pixels. Strip rendering relies on this
/// for reproducible output.
pub trait ToneFilter: Send + Sync {
    /// Returns the unique name of this filter
    fn name(&self) -> &str;

    /// Returns a human-readable description of this filter
    fn description(&self) -> &str;

    /// Apply the tone transform to a photo tile in place.
    ///
    /// The tile is the photo already resized for its grid cell; the canvas
    /// itself is never handed to a filter.
    fn apply(&self, tile: &mut RgbImage) -> Result<()>;
}

/// Multiply a channel by `gain`, saturating into the valid range.
pub(crate) fn scale_channel(value: u8, gain: f32) -> u8 {
    (value as f32 * gain).clamp(0.0, 255.0) as u8
}
