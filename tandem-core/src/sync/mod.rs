//! Synchronization hub
//!
//! Named locks, the bounded message queue, and the event flags used for the
//! startup readiness barrier and shutdown signaling.

pub mod flags;
pub mod hub;
pub mod message;

pub use flags::{EventBits, EventGroup};
pub use hub::{LockId, SyncHub};
pub use message::{SystemEvent, SystemMessage};
