//! # Tone Filter System
//!
//! Named per-photo color transforms. Each filter is a deterministic pixel
//! transform applied to a photo's tile before it is blitted onto the canvas,
//! so no filter state can leak between photos and identical inputs always
//! produce identical output.
//!
//! ## Built-in Filters
//!
//! - **Normal**: untouched colors
//! - **Warm**: lifted reds, cut blues
//! - **Cool**: lifted blues, cut reds
//! - **Vintage**: sepia tones with a faded lift
//! - **Bw**: Rec. 601 grayscale
//! - **Dramatic**: boosted contrast and saturation

pub mod registry;
pub mod traits;

// Filter implementations
pub mod cool;
pub mod dramatic;
pub mod mono;
pub mod normal;
pub mod vintage;
pub mod warm;

// Re-exports for convenience
pub use registry::FilterRegistry;
pub use traits::ToneFilter;

pub use cool::CoolFilter;
pub use dramatic::DramaticFilter;
pub use mono::MonoFilter;
pub use normal::NormalFilter;
pub use vintage::VintageFilter;
pub use warm::WarmFilter;
