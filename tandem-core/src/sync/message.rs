//! Inter-task messages
//!
//! Messages are best-effort notifications. Nothing depends on them for
//! correctness; the shared state is the source of truth.

use tandem_display::SurfaceKind;

use crate::nav::{AppMode, NavEvent};

/// Lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemEvent {
    /// Input controller started
    ControllerReady,
    /// Displays initialized
    DisplayReady,
    /// User confirmed the exit prompt
    ExitConfirmed,
    /// Orderly shutdown requested
    ShutdownRequested,
}

/// Queue payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemMessage {
    /// Navigation state changed
    StateChange { mode: AppMode, version: u32 },
    /// A debounced button press
    ButtonEvent(NavEvent),
    /// A surface finished rendering a version
    DisplayUpdate { surface: SurfaceKind, version: u32 },
    /// Lifecycle event
    SystemEvent(SystemEvent),
}
