//! # Composition Module
//!
//! The compositor that orchestrates geometry planning, asset loading, and
//! the draw pass into one finalized strip, plus the session wrapper that
//! handles request supersession.

pub mod engine;
pub mod session;

pub use engine::{RenderRequest, RenderedStrip, StripEngine};
pub use session::{RenderPhase, StripSession};
