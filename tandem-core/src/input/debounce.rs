//! Debounce and edge detection
//!
//! Each button is Released or Pressed. A raw level change restarts that
//! button's timer. Once the level has been stable for the debounce window,
//! an asserted level on a released button emits one press and marks it
//! Pressed; a deasserted level on a pressed button marks it Released with no
//! event.
//!
//! At most one press is produced per sample. Buttons are scanned in order
//! and the first press ends the scan, so later buttons are looked at again
//! on the next sample.

use crate::config::BUTTON_COUNT;

use super::button::{ButtonId, ButtonState};

/// Debouncer for the whole button cluster
#[derive(Debug, Clone)]
pub struct Debouncer {
    buttons: [ButtonState; BUTTON_COUNT],
    window_ms: u64,
}

impl Debouncer {
    /// Create a debouncer with every button released
    pub const fn new(window_ms: u32) -> Self {
        Self {
            buttons: [
                ButtonState::new(ButtonId::Up),
                ButtonState::new(ButtonId::Down),
                ButtonState::new(ButtonId::Left),
                ButtonState::new(ButtonId::Right),
                ButtonState::new(ButtonId::Select1),
                ButtonState::new(ButtonId::Select2),
            ],
            window_ms: window_ms as u64,
        }
    }

    /// Feed one sample of asserted levels taken at `now_ms`
    ///
    /// Returns the button whose press completed on this sample, if any.
    pub fn sample(&mut self, now_ms: u64, levels: &[bool; BUTTON_COUNT]) -> Option<ButtonId> {
        for (button, &level) in self.buttons.iter_mut().zip(levels) {
            if level != button.last_level {
                button.last_transition_ms = now_ms;
            }
            button.last_level = level;

            if now_ms.saturating_sub(button.last_transition_ms) >= self.window_ms {
                if level && !button.pressed {
                    button.pressed = true;
                    return Some(button.id);
                } else if !level && button.pressed {
                    button.pressed = false;
                }
            }
        }
        None
    }

    /// State of one button
    pub fn button(&self, id: ButtonId) -> &ButtonState {
        &self.buttons[id.index()]
    }

    /// Debounce window in milliseconds
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WINDOW: u32 = 50;
    const POLL: u64 = 10;

    fn only(id: ButtonId, level: bool) -> [bool; BUTTON_COUNT] {
        let mut levels = [false; BUTTON_COUNT];
        levels[id.index()] = level;
        levels
    }

    /// Run samples every poll period from `start`, collecting presses
    fn run(
        deb: &mut Debouncer,
        start: u64,
        ticks: u64,
        levels: [bool; BUTTON_COUNT],
    ) -> heapless::Vec<ButtonId, 64> {
        let mut out = heapless::Vec::new();
        for i in 0..ticks {
            if let Some(id) = deb.sample(start + i * POLL, &levels) {
                out.push(id).unwrap();
            }
        }
        out
    }

    #[test]
    fn test_short_blip_rejected() {
        let mut deb = Debouncer::new(WINDOW);
        let idle = [false; BUTTON_COUNT];
        let mut presses = run(&mut deb, 0, 10, idle);
        // Asserted for 30 ms, less than the window
        presses.extend(run(&mut deb, 100, 3, only(ButtonId::Up, true)));
        presses.extend(run(&mut deb, 130, 20, idle));
        assert!(presses.is_empty());
        assert!(!deb.button(ButtonId::Up).pressed);
    }

    #[test]
    fn test_held_press_emits_once_release_silent() {
        let mut deb = Debouncer::new(WINDOW);
        let idle = [false; BUTTON_COUNT];
        run(&mut deb, 0, 10, idle);

        let presses = run(&mut deb, 100, 30, only(ButtonId::Down, true));
        assert_eq!(presses.as_slice(), &[ButtonId::Down]);
        assert!(deb.button(ButtonId::Down).pressed);

        let releases = run(&mut deb, 400, 30, idle);
        assert!(releases.is_empty());
        assert!(!deb.button(ButtonId::Down).pressed);
    }

    #[test]
    fn test_press_at_exact_window() {
        let mut deb = Debouncer::new(WINDOW);
        let down = only(ButtonId::Left, true);
        assert_eq!(deb.sample(100, &down), None);
        assert_eq!(deb.sample(149, &down), None);
        assert_eq!(deb.sample(150, &down), Some(ButtonId::Left));
        assert_eq!(deb.sample(160, &down), None);
    }

    #[test]
    fn test_first_button_in_scan_order_wins() {
        let mut deb = Debouncer::new(WINDOW);
        let mut both = [false; BUTTON_COUNT];
        both[ButtonId::Down.index()] = true;
        both[ButtonId::Select2.index()] = true;

        let presses = run(&mut deb, 0, 10, both);
        // One event per sample; the later button fires on the following sample
        assert_eq!(presses.as_slice(), &[ButtonId::Down, ButtonId::Select2]);
    }

    #[test]
    fn test_repress_after_release() {
        let mut deb = Debouncer::new(WINDOW);
        let down = only(ButtonId::Select1, true);
        let idle = [false; BUTTON_COUNT];
        assert_eq!(run(&mut deb, 0, 10, down).len(), 1);
        assert_eq!(run(&mut deb, 100, 10, idle).len(), 0);
        assert_eq!(run(&mut deb, 200, 10, down).len(), 1);
    }

    proptest! {
        #[test]
        fn prop_bounce_shorter_than_window_never_fires(
            pattern in proptest::collection::vec(any::<bool>(), 1..4usize)
        ) {
            // Any bounce lasting fewer than WINDOW / POLL samples, ending idle
            let mut deb = Debouncer::new(WINDOW);
            let mut t = 100;
            for level in pattern {
                prop_assert_eq!(deb.sample(t, &only(ButtonId::Right, level)), None);
                t += POLL;
            }
            for _ in 0..20 {
                prop_assert_eq!(deb.sample(t, &[false; BUTTON_COUNT]), None);
                t += POLL;
            }
        }
    }
}
