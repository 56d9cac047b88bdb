//! Display surface task body
//!
//! A surface redraws when it has never drawn, when the change version moved
//! past the one it last drew, or when the mode differs from the one it last
//! drew. Each surface keeps its own last-seen version, so two surfaces on
//! different periods both pick up every change.
//!
//! The state snapshot is taken before the display lock is requested; the
//! surface never holds a state lock and the display lock together.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Duration;
use tandem_display::{DisplayError, RenderTarget, SurfaceKind};

use super::render::{compose, draw, splash};
use crate::error::InitError;
use crate::nav::AppMode;
use crate::state::{NavigationState, SharedState};
use crate::sync::{SyncHub, SystemMessage};

/// Result of one surface tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Nothing new to show
    Idle,
    /// Drew the given version
    Rendered(u32),
    /// Display lock busy; retried next tick
    LockBusy,
    /// Target reported an error; retried next tick
    Failed(DisplayError),
}

/// One physical display driven from the shared state
pub struct DisplaySurface<'a, M: RawMutex, T: RenderTarget> {
    target: T,
    state: &'a SharedState<M>,
    hub: &'a SyncHub<M>,
    period: Duration,
    last_version: Option<u32>,
    last_mode: Option<AppMode>,
}

impl<'a, M: RawMutex, T: RenderTarget> DisplaySurface<'a, M, T> {
    /// Wrap a target; `period_ms` is this surface's refresh period
    pub fn new(target: T, state: &'a SharedState<M>, hub: &'a SyncHub<M>, period_ms: u32) -> Self {
        Self {
            target,
            state,
            hub,
            period: Duration::from_millis(period_ms as u64),
            last_version: None,
            last_mode: None,
        }
    }

    /// Which surface this is
    pub fn kind(&self) -> SurfaceKind {
        self.target.kind()
    }

    /// Refresh period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Version last drawn, if any
    pub fn last_version(&self) -> Option<u32> {
        self.last_version
    }

    /// Underlying target
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Bring the display up and show the splash
    pub async fn initialize(&mut self) -> Result<(), InitError> {
        let kind = self.kind();
        let _guard = self
            .hub
            .lock_display()
            .await
            .map_err(|_| InitError::Display(kind))?;
        self.target.init().await.map_err(|_| InitError::Display(kind))?;
        splash(&mut self.target)
            .await
            .map_err(|_| InitError::Display(kind))
    }

    /// Whether `view` holds something this surface has not drawn
    pub fn needs_render(&self, view: &NavigationState) -> bool {
        match (self.last_version, self.last_mode) {
            (Some(version), Some(mode)) => view.change_version != version || view.mode != mode,
            _ => true,
        }
    }

    /// One refresh cycle
    pub async fn tick(&mut self) -> TickOutcome {
        let view = self.state.snapshot().await;
        if !self.needs_render(&view) {
            return TickOutcome::Idle;
        }

        let panel = compose(self.kind(), &view);
        {
            let Ok(_guard) = self.hub.lock_display().await else {
                return TickOutcome::LockBusy;
            };
            if let Err(err) = draw(&mut self.target, &panel).await {
                return TickOutcome::Failed(err);
            }
        }

        self.last_version = Some(view.change_version);
        self.last_mode = Some(view.mode);
        let _ = self.hub.try_send(SystemMessage::DisplayUpdate {
            surface: self.kind(),
            version: view.change_version,
        });
        TickOutcome::Rendered(view.change_version)
    }

    /// Clear the display for shutdown
    ///
    /// Returns `false` if the display lock was busy or the target failed.
    pub async fn cleanup(&mut self) -> bool {
        let Ok(_guard) = self.hub.lock_display().await else {
            return false;
        };
        self.target.shutdown().await.is_ok()
    }
}
