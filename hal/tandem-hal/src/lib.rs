//! Tandem Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits that the navigation
//! core consumes. Chip-specific code (the RP2040 firmware, host test mocks)
//! implements them, so the same core logic runs on the device and on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (tandem-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tandem-core (navigation, sync, input)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tandem-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`], [`gpio::ButtonLine`] - Digital inputs and logical buttons
//! - [`clock::ClockSource`] - Real-time clock collaborator

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use clock::{ClockSource, DateTime, NoClock};
pub use gpio::{ActiveLow, ButtonLine, InputPin};
