//! GPIO input abstractions
//!
//! Buttons are wired active-low with pull-up biasing: the electrical level
//! is high at rest and pulled low while the button is held. The core only
//! ever asks "is this logical line asserted right now", so the electrical
//! polarity is resolved here.

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// A logical input line with the electrical polarity already resolved
pub trait ButtonLine {
    /// True while the line is asserted (button held)
    fn is_asserted(&self) -> bool;
}

/// Active-low adapter: the line is asserted while the pin reads low
#[derive(Debug)]
pub struct ActiveLow<P>(P);

impl<P: InputPin> ActiveLow<P> {
    /// Wrap a pull-up input pin
    pub const fn new(pin: P) -> Self {
        Self(pin)
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P: InputPin> ButtonLine for ActiveLow<P> {
    fn is_asserted(&self) -> bool {
        self.0.is_low()
    }
}

impl ButtonLine for bool {
    fn is_asserted(&self) -> bool {
        *self
    }
}
