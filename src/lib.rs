//! # Photostrip
//!
//! Deterministic photo-strip compositing: ordered photos in, one flattened
//! raster strip out.
//!
//! This library arranges 1-9 photos into a pixel-accurate grid, fits each
//! one into its cell without cropping, runs a named tone filter per photo,
//! layers decorative overlays, and lays out a footer band with caption,
//! date stamp, and watermark — tolerating individual image-load failures
//! without aborting the render.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use photostrip::{
//!     AssetSource, LayoutConfig, PhotoSet, RenderRequest, StripEngine,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let photos = PhotoSet::new(vec![
//!     AssetSource::path("one.jpg"),
//!     AssetSource::path("two.jpg"),
//!     AssetSource::path("three.jpg"),
//! ])?;
//!
//! let engine = StripEngine::new();
//! let strip = engine
//!     .compose(&RenderRequest::new(photos, LayoutConfig::default()))
//!     .await?;
//!
//! strip.save_png("strip.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`layout`] - Grid planning, aspect-fitting, footer slot placement
//! - [`assets`] - Concurrent, all-settled photo/decoration/font loading
//! - [`filters`] - Named per-photo tone filters
//! - [`render`] - The drawing surface and pixel operations
//! - [`composition`] - The compositor and the superseding session wrapper
//! - [`config`] - Layout and style configuration
//!
//! ## Superseding requests
//!
//! Interactive callers usually re-compose on every settings change. Wrap the
//! engine in a [`StripSession`](composition::StripSession): each submit
//! claims a fresh generation, and a stale request's result is discarded
//! instead of overwriting a newer strip.
//!
//! ```rust,no_run
//! use photostrip::{
//!     AssetSource, LayoutConfig, PhotoSet, RenderRequest, StripEngine, StripSession,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let session = StripSession::new(StripEngine::new());
//! let photos = PhotoSet::new(vec![AssetSource::path("one.jpg")])?;
//!
//! if let Some(strip) = session
//!     .submit(RenderRequest::new(photos, LayoutConfig::default()))
//!     .await?
//! {
//!     println!("published generation {}", strip.generation());
//! }
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod composition;
pub mod config;
pub mod error;
pub mod filters;
pub mod layout;
pub mod render;

// Re-export commonly used types for convenience
pub use crate::{
    assets::{AssetLoader, AssetSource, Decoration, PhotoSet},
    composition::{RenderPhase, RenderRequest, RenderedStrip, StripEngine, StripSession},
    config::{Caption, Color, FilterKind, LayoutConfig},
    error::{Result, StripError},
    filters::{FilterRegistry, ToneFilter}, // Export filter trait
};
