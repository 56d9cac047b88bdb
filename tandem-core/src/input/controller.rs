//! Input controller
//!
//! Turns sampled button levels into navigation. Each produced press is
//! dispatched through the handler table for the current mode, and the
//! resulting action is applied through the `SharedState` accessors.

use embassy_sync::blocking_mutex::raw::RawMutex;
use tandem_hal::{ButtonLine, ClockSource};

use super::debounce::Debouncer;
use crate::config::{TimingConfig, BUTTON_COUNT};
use crate::nav::{dispatch, Action, AppMode, NavEvent};
use crate::state::SharedState;
use crate::sync::{SyncHub, SystemEvent, SystemMessage};

/// Input controller
pub struct InputController<'a, M: RawMutex, C: ClockSource> {
    state: &'a SharedState<M>,
    hub: &'a SyncHub<M>,
    clock: C,
    debouncer: Debouncer,
}

impl<'a, M: RawMutex, C: ClockSource> InputController<'a, M, C> {
    /// Create a controller; every button starts released
    pub fn new(state: &'a SharedState<M>, hub: &'a SyncHub<M>, clock: C, timing: &TimingConfig) -> Self {
        Self {
            state,
            hub,
            clock,
            debouncer: Debouncer::new(timing.debounce_ms),
        }
    }

    /// Sample the buttons once and handle a press if one completed
    pub async fn poll<L: ButtonLine>(
        &mut self,
        now_ms: u64,
        lines: &[L; BUTTON_COUNT],
    ) -> Option<(NavEvent, Action)> {
        let levels: [bool; BUTTON_COUNT] = core::array::from_fn(|i| lines[i].is_asserted());
        let button = self.debouncer.sample(now_ms, &levels)?;
        let event = button.event();
        Some((event, self.handle_event(event).await))
    }

    /// Dispatch one event for the current mode and apply the result
    pub async fn handle_event(&mut self, event: NavEvent) -> Action {
        let _ = self.hub.try_send(SystemMessage::ButtonEvent(event));

        let mode = self.state.mode().await;
        let menu_index = self.state.menu_index().await;
        let action = dispatch(mode, menu_index, event);

        let changed = match action {
            Action::Stay => false,
            Action::SelectPrevious => self.state.decrement_menu_index().await,
            Action::SelectNext => self.state.increment_menu_index().await,
            Action::SnapshotTime => {
                self.state.refresh_time(&mut self.clock).await;
                false
            }
            Action::Enter(target) => self.state.set_mode(target).await,
            Action::ExitConfirmed => {
                let _ = self
                    .hub
                    .try_send(SystemMessage::SystemEvent(SystemEvent::ExitConfirmed));
                self.state.set_mode(AppMode::Menu).await
            }
        };

        if changed {
            let version = self.state.current_version().await;
            self.hub
                .notify_state_change(action.target_mode().unwrap_or(mode), version);
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use tandem_hal::{DateTime, NoClock};

    use crate::config::LockTimeouts;
    use crate::input::ButtonId;
    use crate::sync::EventBits;

    type Mutex = CriticalSectionRawMutex;

    struct FixedClock(DateTime);

    impl ClockSource for FixedClock {
        type Error = ();

        fn available(&self) -> bool {
            true
        }

        async fn now(&mut self) -> Result<DateTime, ()> {
            Ok(self.0)
        }
    }

    fn parts() -> (SharedState<Mutex>, SyncHub<Mutex>) {
        let hub = SyncHub::new(LockTimeouts::DEFAULT);
        hub.initialize().unwrap();
        (SharedState::new(LockTimeouts::DEFAULT), hub)
    }

    fn press(id: ButtonId) -> [bool; BUTTON_COUNT] {
        let mut lines = [false; BUTTON_COUNT];
        lines[id.index()] = true;
        lines
    }

    #[test]
    fn test_debounced_press_moves_selection() {
        let (state, hub) = parts();
        let mut ctl = InputController::new(&state, &hub, NoClock, &TimingConfig::DEFAULT);
        let down = press(ButtonId::Down);

        let mut handled = None;
        for t in (0..100).step_by(10) {
            if let Some(result) = block_on(ctl.poll(t, &down)) {
                assert!(handled.is_none(), "press handled twice");
                handled = Some(result);
            }
        }
        assert_eq!(handled, Some((NavEvent::Down, Action::SelectNext)));
        assert_eq!(block_on(state.menu_index()), 1);
        assert_eq!(block_on(state.current_version()), 1);

        assert_eq!(hub.try_receive(), Some(SystemMessage::ButtonEvent(NavEvent::Down)));
        assert_eq!(
            hub.try_receive(),
            Some(SystemMessage::StateChange {
                mode: AppMode::Menu,
                version: 1
            })
        );
        assert!(hub.flags().bits().contains(EventBits::STATE_CHANGED));
    }

    #[test]
    fn test_exit_prompt_and_cancel() {
        let (state, hub) = parts();
        let mut ctl = InputController::new(&state, &hub, NoClock, &TimingConfig::DEFAULT);
        block_on(state.set_menu_index(3)).unwrap();

        let action = block_on(ctl.handle_event(NavEvent::SelectPrimary));
        assert_eq!(action, Action::Enter(AppMode::ConfirmExit));
        assert_eq!(block_on(state.mode()), AppMode::ConfirmExit);

        block_on(ctl.handle_event(NavEvent::Left));
        assert_eq!(block_on(state.mode()), AppMode::Menu);
    }

    #[test]
    fn test_exit_confirmed_returns_to_menu() {
        let (state, hub) = parts();
        let mut ctl = InputController::new(&state, &hub, NoClock, &TimingConfig::DEFAULT);
        block_on(state.set_mode(AppMode::ConfirmExit));
        while hub.try_receive().is_some() {}

        assert_eq!(block_on(ctl.handle_event(NavEvent::SelectPrimary)), Action::ExitConfirmed);
        assert_eq!(block_on(state.mode()), AppMode::Menu);
        assert!(!hub.shutdown_requested());

        let mut saw_exit = false;
        while let Some(msg) = hub.try_receive() {
            saw_exit |= msg == SystemMessage::SystemEvent(SystemEvent::ExitConfirmed);
        }
        assert!(saw_exit);
    }

    #[test]
    fn test_settings_up_changes_nothing() {
        let (state, hub) = parts();
        let mut ctl = InputController::new(&state, &hub, NoClock, &TimingConfig::DEFAULT);
        block_on(state.set_menu_index(1)).unwrap();
        block_on(state.set_mode(AppMode::Settings));
        let before = block_on(state.snapshot());

        assert_eq!(block_on(ctl.handle_event(NavEvent::Up)), Action::Stay);
        assert_eq!(block_on(state.snapshot()), before);
    }

    #[test]
    fn test_home_snapshots_clock() {
        let (state, hub) = parts();
        let now = DateTime::new(2024, 3, 9, 17, 45, 2);
        let mut ctl = InputController::new(&state, &hub, FixedClock(now), &TimingConfig::DEFAULT);

        assert_eq!(block_on(ctl.handle_event(NavEvent::SelectPrimary)), Action::SnapshotTime);
        assert_eq!(block_on(state.time()), now);
        assert_eq!(block_on(state.mode()), AppMode::Menu);
        assert_eq!(block_on(state.current_version()), 0);
    }

    #[test]
    fn test_full_queue_does_not_block_navigation() {
        let (state, hub) = parts();
        let mut ctl = InputController::new(&state, &hub, NoClock, &TimingConfig::DEFAULT);
        while hub.try_send(SystemMessage::ButtonEvent(NavEvent::Right)).is_ok() {}

        block_on(ctl.handle_event(NavEvent::Up));
        assert_eq!(block_on(state.menu_index()), 3);
    }
}
