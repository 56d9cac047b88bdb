//! Navigation transitions
//!
//! Handlers are pure: they take the current menu index and an event and
//! return the [`Action`] to apply. The controller applies the action through
//! the shared state accessors, so no handler ever touches a lock.

use super::events::NavEvent;
use super::mode::{AppMode, MenuItem};

/// Outcome of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Event ignored in this mode
    Stay,
    /// Move the selection up one entry (wrapping)
    SelectPrevious,
    /// Move the selection down one entry (wrapping)
    SelectNext,
    /// Copy the clock into the cached time
    SnapshotTime,
    /// Switch screen
    Enter(AppMode),
    /// Exit confirmed; returns to the menu
    ExitConfirmed,
}

impl Action {
    /// Mode the action leaves the machine in, if it changes it
    pub fn target_mode(&self) -> Option<AppMode> {
        match self {
            Action::Enter(mode) => Some(*mode),
            Action::ExitConfirmed => Some(AppMode::Menu),
            _ => None,
        }
    }
}

type Handler = fn(usize, NavEvent) -> Action;

/// Per-mode handlers, indexed by `AppMode` discriminant
const HANDLERS: [Handler; 4] = [menu, settings, about, confirm_exit];

/// Route an event to the handler for `mode`
pub fn dispatch(mode: AppMode, menu_index: usize, event: NavEvent) -> Action {
    HANDLERS[mode.as_u8() as usize](menu_index, event)
}

fn menu(menu_index: usize, event: NavEvent) -> Action {
    match event {
        NavEvent::Up => Action::SelectPrevious,
        NavEvent::Down => Action::SelectNext,
        NavEvent::SelectPrimary => match MenuItem::from_index(menu_index) {
            Some(MenuItem::Home) => Action::SnapshotTime,
            Some(MenuItem::Settings) => Action::Enter(AppMode::Settings),
            Some(MenuItem::About) => Action::Enter(AppMode::About),
            Some(MenuItem::Exit) => Action::Enter(AppMode::ConfirmExit),
            None => Action::Stay,
        },
        _ => Action::Stay,
    }
}

fn settings(_: usize, event: NavEvent) -> Action {
    if event.is_back() {
        Action::Enter(AppMode::Menu)
    } else {
        Action::Stay
    }
}

fn about(_: usize, event: NavEvent) -> Action {
    if event.is_back() {
        Action::Enter(AppMode::Menu)
    } else {
        Action::Stay
    }
}

fn confirm_exit(_: usize, event: NavEvent) -> Action {
    match event {
        NavEvent::SelectPrimary => Action::ExitConfirmed,
        NavEvent::Left | NavEvent::SelectSecondary => Action::Enter(AppMode::Menu),
        _ => Action::Stay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_up_down() {
        assert_eq!(dispatch(AppMode::Menu, 0, NavEvent::Up), Action::SelectPrevious);
        assert_eq!(dispatch(AppMode::Menu, 0, NavEvent::Down), Action::SelectNext);
    }

    #[test]
    fn test_menu_select_primary() {
        let expected = [
            Action::SnapshotTime,
            Action::Enter(AppMode::Settings),
            Action::Enter(AppMode::About),
            Action::Enter(AppMode::ConfirmExit),
        ];
        for (index, action) in expected.into_iter().enumerate() {
            assert_eq!(dispatch(AppMode::Menu, index, NavEvent::SelectPrimary), action);
        }
    }

    #[test]
    fn test_menu_ignores_other_events() {
        for event in [NavEvent::Left, NavEvent::Right, NavEvent::SelectSecondary] {
            assert_eq!(dispatch(AppMode::Menu, 1, event), Action::Stay);
        }
    }

    #[test]
    fn test_sub_screens_return_to_menu() {
        for mode in [AppMode::Settings, AppMode::About, AppMode::ConfirmExit] {
            for event in [NavEvent::Left, NavEvent::SelectSecondary] {
                assert_eq!(dispatch(mode, 0, event), Action::Enter(AppMode::Menu));
            }
        }
    }

    #[test]
    fn test_settings_up_is_noop() {
        assert_eq!(dispatch(AppMode::Settings, 2, NavEvent::Up), Action::Stay);
        assert_eq!(dispatch(AppMode::Settings, 2, NavEvent::SelectPrimary), Action::Stay);
    }

    #[test]
    fn test_confirm_exit() {
        let action = dispatch(AppMode::ConfirmExit, 3, NavEvent::SelectPrimary);
        assert_eq!(action, Action::ExitConfirmed);
        assert_eq!(action.target_mode(), Some(AppMode::Menu));
        assert_eq!(dispatch(AppMode::ConfirmExit, 3, NavEvent::Down), Action::Stay);
    }

    #[test]
    fn test_about_ignores_primary() {
        assert_eq!(dispatch(AppMode::About, 0, NavEvent::SelectPrimary), Action::Stay);
    }
}
