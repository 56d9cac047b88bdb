//! Shared navigation state
//!
//! The single source of truth for the selected menu entry, the current
//! screen and the cached clock reading.

pub mod shared;

pub use shared::{NavigationState, SharedState};
