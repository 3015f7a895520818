//! # Asset Loading Module
//!
//! Resolves photo and decoration source references into decoded image
//! handles, and font roles into parsed faces. Every load settles
//! independently; a failure leaves a hole, never aborts the request.

pub mod fonts;
pub mod loader;
pub mod types;

pub use fonts::FontLibrary;
pub use loader::{AssetLoader, DEFAULT_LOAD_TIMEOUT};
pub use types::{AssetSource, Decoration, LoadedAssets, PhotoSet, MAX_PHOTOS};
