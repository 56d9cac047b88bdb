//! Process-wide context
//!
//! The hub, the shared state and the timing configuration, built once by
//! the orchestrator and handed to every task by reference.

use embassy_sync::blocking_mutex::raw::RawMutex;
use tandem_hal::ClockSource;

use crate::config::{LockTimeouts, TimingConfig};
use crate::error::InitError;
use crate::state::SharedState;
use crate::sync::SyncHub;

/// Shared context for all tasks
pub struct Context<M: RawMutex> {
    /// Locks, queue and event flags
    pub hub: SyncHub<M>,
    /// Navigation state
    pub state: SharedState<M>,
    /// Task periods
    pub timing: TimingConfig,
}

impl<M: RawMutex> Context<M> {
    /// Build an uninitialized context
    pub const fn new(timing: TimingConfig, locks: LockTimeouts) -> Self {
        Self {
            hub: SyncHub::new(locks),
            state: SharedState::new(locks),
            timing,
        }
    }

    /// Validate the configuration, then initialize the hub and the state
    ///
    /// Returns whether the clock seeded the cached time.
    pub async fn initialize<C: ClockSource>(&self, clock: &mut C) -> Result<bool, InitError> {
        self.timing.validate()?;
        self.hub.initialize()?;
        self.state.initialize(clock).await
    }
}
