//! Board-agnostic core logic for the dual display menu controller
//!
//! This crate contains everything that does not depend on specific hardware:
//!
//! - Navigation state machine (modes, events, per-mode handler table)
//! - Shared navigation state with bounded-latency locking
//! - Synchronization hub (named locks, message queue, event flags)
//! - Button debouncing and the input controller
//! - Display surface template and per-mode render routines
//! - Configuration and error types
//!
//! # Data flow
//!
//! ```text
//! buttons ──► InputController ──► SharedState ──► DisplaySurface (pixel)
//!                    │                  │     └──► DisplaySurface (text)
//!                    └──► SyncHub ◄─────┘
//!                   (messages, flags, locks)
//! ```
//!
//! All async code is generic over an `embassy_sync` `RawMutex`, so the same
//! types run on the RP2040 executor and on the host under test.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod error;
pub mod input;
pub mod nav;
pub mod state;
pub mod surface;
pub mod sync;

pub use context::Context;
pub use error::{InitError, InvalidInput, SyncError};
