//! Hardware driver implementations
//!
//! Concrete collaborators for the traits in `tandem-hal` and
//! `tandem-display`:
//!
//! - SSD1306 128x64 OLED over SPI (pixel surface)
//! - HD44780 20x4 character LCD behind a PCF8574 I2C backpack (text surface)
//! - DS1307 real-time clock over I2C

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod rtc;
