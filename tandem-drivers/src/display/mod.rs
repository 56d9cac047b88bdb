//! Display drivers

pub mod hd44780;
pub mod ssd1306;

pub use hd44780::Hd44780;
pub use ssd1306::{FrameBuffer, Ssd1306};
