//! Button input
//!
//! Six active-low buttons are sampled on a fixed period, debounced into
//! press events, and dispatched through the navigation handler table.

pub mod button;
pub mod controller;
pub mod debounce;

pub use button::{ButtonId, ButtonState};
pub use controller::InputController;
pub use debounce::Debouncer;
