//! Screens and menu entries

use crate::config::{MENU_COUNT, MENU_ITEMS};

/// Navigation screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AppMode {
    /// Main menu, the initial screen
    #[default]
    Menu = 0,
    /// System configuration screen
    Settings = 1,
    /// Version and credits screen
    About = 2,
    /// Exit confirmation prompt
    ConfirmExit = 3,
}

impl AppMode {
    /// All modes in discriminant order
    pub const ALL: [AppMode; 4] = [
        AppMode::Menu,
        AppMode::Settings,
        AppMode::About,
        AppMode::ConfirmExit,
    ];

    /// Stable numeric encoding
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode; unknown values fall back to `Menu`
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => AppMode::Settings,
            2 => AppMode::About,
            3 => AppMode::ConfirmExit,
            _ => AppMode::Menu,
        }
    }

    /// Short name for logs
    pub const fn name(self) -> &'static str {
        match self {
            AppMode::Menu => "menu",
            AppMode::Settings => "settings",
            AppMode::About => "about",
            AppMode::ConfirmExit => "confirm-exit",
        }
    }
}

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    /// Snapshot the clock
    Home,
    /// Open settings
    Settings,
    /// Open about
    About,
    /// Ask to exit
    Exit,
}

impl MenuItem {
    /// All entries in display order
    pub const ALL: [MenuItem; MENU_COUNT] = [
        MenuItem::Home,
        MenuItem::Settings,
        MenuItem::About,
        MenuItem::Exit,
    ];

    /// Look up an entry by menu index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position in the menu
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label
    pub fn label(self) -> &'static str {
        MENU_ITEMS[self.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_mode_is_menu() {
        assert_eq!(AppMode::default(), AppMode::Menu);
    }

    #[test]
    fn test_mode_encoding() {
        for mode in AppMode::ALL {
            assert_eq!(AppMode::from_u8(mode.as_u8()), mode);
        }
        assert_eq!(AppMode::from_u8(200), AppMode::Menu);
    }

    #[test]
    fn test_menu_items() {
        assert_eq!(MenuItem::from_index(0), Some(MenuItem::Home));
        assert_eq!(MenuItem::from_index(3).map(MenuItem::label), Some("Exit"));
        assert_eq!(MenuItem::from_index(MENU_COUNT), None);
        assert_eq!(MenuItem::About.index(), 2);
    }
}
