//! Embassy async tasks
//!
//! Every task loop checks Shutdown-Requested once per period, while holding
//! no lock, and returns when it is set.

pub mod clock;
pub mod display;
pub mod input;
pub mod status;

pub use clock::clock_task;
pub use display::{pixel_display_task, text_display_task};
pub use input::input_task;
pub use status::status_task;
