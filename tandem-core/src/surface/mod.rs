//! Display surfaces
//!
//! [`DisplaySurface`] is the per-display task body: it watches the shared
//! state and redraws its target when something it has not shown yet
//! changed. [`render`] holds the per-mode screen layouts for each
//! [`SurfaceKind`](tandem_display::SurfaceKind).

pub mod display;
pub mod render;

pub use display::{DisplaySurface, TickOutcome};
pub use render::{compose, draw, Panel, SPLASH};
