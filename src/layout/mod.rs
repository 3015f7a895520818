//! # Strip Geometry
//!
//! Pure layout computation: photo grid planning, aspect-preserving fitting,
//! and footer slot placement. Nothing here touches pixels; the compositor
//! consumes these plans during its draw pass.

pub mod fit;
pub mod footer;
pub mod grid;
pub mod types;

pub use fit::{fit_region, Placement};
pub use footer::{plan_footer, FooterElement};
pub use grid::compute_layout;
pub use types::{CanvasPlan, Rect};
