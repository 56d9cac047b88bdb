//! Button identities and per-button debounce state

use crate::config::BUTTON_COUNT;
use crate::error::InvalidInput;
use crate::nav::NavEvent;

/// Physical buttons, in scan order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    /// Primary select
    Select1 = 4,
    /// Secondary select
    Select2 = 5,
}

impl ButtonId {
    /// All buttons in scan order
    pub const ALL: [ButtonId; BUTTON_COUNT] = [
        ButtonId::Up,
        ButtonId::Down,
        ButtonId::Left,
        ButtonId::Right,
        ButtonId::Select1,
        ButtonId::Select2,
    ];

    /// Scan position
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a button by scan position
    pub fn from_index(index: u8) -> Result<Self, InvalidInput> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(InvalidInput::UnknownButton(index))
    }

    /// Navigation event a press produces
    pub const fn event(self) -> NavEvent {
        match self {
            ButtonId::Up => NavEvent::Up,
            ButtonId::Down => NavEvent::Down,
            ButtonId::Left => NavEvent::Left,
            ButtonId::Right => NavEvent::Right,
            ButtonId::Select1 => NavEvent::SelectPrimary,
            ButtonId::Select2 => NavEvent::SelectSecondary,
        }
    }
}

/// Debounce bookkeeping for one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonState {
    /// Which button
    pub id: ButtonId,
    /// Asserted level seen on the previous sample
    pub last_level: bool,
    /// When the level last changed (ms)
    pub last_transition_ms: u64,
    /// Debounced pressed flag
    pub pressed: bool,
}

impl ButtonState {
    /// Released, idle since t = 0
    pub const fn new(id: ButtonId) -> Self {
        Self {
            id,
            last_level: false,
            last_transition_ms: 0,
            pressed: false,
        }
    }
}
