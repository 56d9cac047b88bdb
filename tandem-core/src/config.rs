//! Configuration
//!
//! Fixed tables and tunable periods. `TimingConfig` and `LockTimeouts` can be
//! overridden per board at build time; everything else is compiled in.

use embassy_time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Menu labels, in display order
pub const MENU_ITEMS: [&str; MENU_COUNT] = ["Home", "Settings", "About", "Exit"];

/// Number of menu entries
pub const MENU_COUNT: usize = 4;

/// Number of physical buttons
pub const BUTTON_COUNT: usize = 6;

/// Capacity of the inter-task message queue
pub const MESSAGE_QUEUE_CAPACITY: usize = 10;

/// Queue depth above which the status monitor warns
pub const QUEUE_WARN_DEPTH: usize = 8;

/// Firmware version shown on the settings and about screens
pub const VERSION: &str = "0.1.0";

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A period that drives a loop was zero
    ZeroPeriod(&'static str),
    /// Debounce window shorter than one poll period
    DebounceShorterThanPoll,
}

/// Task periods and protocol timeouts, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Button sampling period
    pub input_poll_ms: u32,
    /// Minimum stable time before a level change counts
    pub debounce_ms: u32,
    /// Pixel surface refresh period
    pub pixel_refresh_ms: u32,
    /// Text surface refresh period
    pub text_refresh_ms: u32,
    /// Startup readiness barrier timeout
    pub ready_timeout_ms: u32,
    /// Cached clock refresh period
    pub clock_refresh_ms: u32,
    /// Status report period
    pub status_interval_ms: u32,
}

impl TimingConfig {
    /// Reference timing
    pub const DEFAULT: Self = Self {
        input_poll_ms: 10,
        debounce_ms: 50,
        pixel_refresh_ms: 250,
        text_refresh_ms: 500,
        ready_timeout_ms: 5000,
        clock_refresh_ms: 1000,
        status_interval_ms: 10_000,
    };

    /// Check that every period can drive a loop
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("input_poll_ms", self.input_poll_ms),
            ("pixel_refresh_ms", self.pixel_refresh_ms),
            ("text_refresh_ms", self.text_refresh_ms),
            ("clock_refresh_ms", self.clock_refresh_ms),
            ("status_interval_ms", self.status_interval_ms),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroPeriod(*name));
        }
        if self.debounce_ms < self.input_poll_ms {
            return Err(ConfigError::DebounceShorterThanPoll);
        }
        Ok(())
    }

    /// Input poll period
    pub fn input_poll(&self) -> Duration {
        Duration::from_millis(self.input_poll_ms as u64)
    }

    /// Readiness barrier timeout
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms as u64)
    }

    /// Clock refresh period
    pub fn clock_refresh(&self) -> Duration {
        Duration::from_millis(self.clock_refresh_ms as u64)
    }

    /// Status report period
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms as u64)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Bounded lock waits, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LockTimeouts {
    /// Navigation reads (mode, index, snapshot)
    pub state_read: u32,
    /// Navigation writes
    pub state_write: u32,
    /// Change version checks
    pub change_check: u32,
    /// Display lock
    pub display: u32,
    /// Serialized output lock
    pub output: u32,
    /// Cached time writes
    pub time_write: u32,
}

impl LockTimeouts {
    /// Reference timeouts
    pub const DEFAULT: Self = Self {
        state_read: 10,
        state_write: 100,
        change_check: 20,
        display: 100,
        output: 100,
        time_write: 100,
    };
}

impl Default for LockTimeouts {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Convert a millisecond setting to a `Duration`
pub(crate) fn ms(value: u32) -> Duration {
    Duration::from_millis(value as u64)
}
