//! Error types
//!
//! Only startup failures are fatal. Everything else is reported so the
//! caller can skip the current cycle.

use tandem_display::SurfaceKind;

use crate::config::ConfigError;

/// Startup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Initialization ran twice
    AlreadyInitialized,
    /// A display failed to come up
    Display(SurfaceKind),
    /// A task could not be spawned
    TaskSpawn,
    /// Build-time configuration was invalid
    Config(ConfigError),
}

impl From<ConfigError> for InitError {
    fn from(err: ConfigError) -> Self {
        InitError::Config(err)
    }
}

/// Transient synchronization failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// A lock was not acquired in time
    LockTimeout,
    /// Queue had no room; the message was dropped
    QueueFull,
    /// A queue or flag wait elapsed
    Timeout,
}

/// Rejected arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidInput {
    /// Menu index outside the table
    IndexOutOfRange { index: usize, count: usize },
    /// Button number outside the cluster
    UnknownButton(u8),
}
