//! Button events that drive navigation

/// Semantic press events, one per button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavEvent {
    Up,
    Down,
    Left,
    Right,
    /// Primary select (confirm)
    SelectPrimary,
    /// Secondary select (back)
    SelectSecondary,
}

impl NavEvent {
    /// All events in button scan order
    pub const ALL: [NavEvent; 6] = [
        NavEvent::Up,
        NavEvent::Down,
        NavEvent::Left,
        NavEvent::Right,
        NavEvent::SelectPrimary,
        NavEvent::SelectSecondary,
    ];

    /// Check if this event leaves a sub-screen
    pub fn is_back(&self) -> bool {
        matches!(self, NavEvent::Left | NavEvent::SelectSecondary)
    }
}
