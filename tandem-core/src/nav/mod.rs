//! Navigation state machine
//!
//! Four screens, six button events, and a per-mode handler table that maps
//! an event to an [`Action`] for the input controller to apply.

pub mod events;
pub mod machine;
pub mod mode;

pub use events::NavEvent;
pub use machine::{dispatch, Action};
pub use mode::{AppMode, MenuItem};
