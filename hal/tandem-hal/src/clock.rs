//! Real-time clock abstractions
//!
//! The clock is an optional collaborator. Consumers must tolerate it being
//! absent or failing and keep using the last reading they obtained.

use core::fmt::Write;

use heapless::String;

/// Calendar timestamp with one-second resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    /// Full year (2000-2099 for the supported RTCs)
    pub year: u16,
    /// Month (1-12)
    pub month: u8,
    /// Day of month (1-31)
    pub day: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
}

impl Default for DateTime {
    fn default() -> Self {
        Self::EPOCH
    }
}

impl DateTime {
    /// Reading used before any clock sample exists
    pub const EPOCH: Self = Self {
        year: 2000,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Create a timestamp from calendar fields
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Check that every field is within its calendar range
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }

    /// Seconds since midnight
    pub fn seconds_of_day(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    /// Format as `HH:MM:SS`
    pub fn time_string(&self) -> String<8> {
        let mut s = String::new();
        let _ = write!(s, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second);
        s
    }

    /// Format as `HH:MM:SS DD/MM/YYYY`
    pub fn full_string(&self) -> String<19> {
        let mut s = String::new();
        let _ = write!(
            s,
            "{:02}:{:02}:{:02} {:02}/{:02}/{:04}",
            self.hour, self.minute, self.second, self.day, self.month, self.year
        );
        s
    }
}

/// Real-time clock source
///
/// `available()` reports whether the device answered during bring-up.
/// `now()` may still fail afterwards (bus glitch, oscillator halted); callers
/// keep their previous value in that case.
#[allow(async_fn_in_trait)]
pub trait ClockSource {
    /// Error type for clock reads
    type Error;

    /// Whether the clock hardware is present and running
    fn available(&self) -> bool;

    /// Read the current time
    async fn now(&mut self) -> Result<DateTime, Self::Error>;
}

impl<C: ClockSource> ClockSource for &mut C {
    type Error = C::Error;

    fn available(&self) -> bool {
        (**self).available()
    }

    async fn now(&mut self) -> Result<DateTime, Self::Error> {
        (**self).now().await
    }
}

/// Clock stand-in for boards without an RTC fitted
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClock;

impl ClockSource for NoClock {
    type Error = ();

    fn available(&self) -> bool {
        false
    }

    async fn now(&mut self) -> Result<DateTime, Self::Error> {
        Err(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_string() {
        let t = DateTime::new(2024, 3, 9, 7, 5, 3);
        assert_eq!(t.time_string().as_str(), "07:05:03");
    }

    #[test]
    fn test_full_string() {
        let t = DateTime::new(2024, 12, 31, 23, 59, 58);
        assert_eq!(t.full_string().as_str(), "23:59:58 31/12/2024");
    }

    #[test]
    fn test_validity() {
        assert!(DateTime::EPOCH.is_valid());
        assert!(!DateTime::new(2024, 13, 1, 0, 0, 0).is_valid());
        assert!(!DateTime::new(2024, 1, 1, 24, 0, 0).is_valid());
        assert!(!DateTime::new(2024, 1, 0, 0, 0, 0).is_valid());
    }

    #[test]
    fn test_seconds_of_day() {
        assert_eq!(DateTime::new(2024, 1, 1, 1, 1, 1).seconds_of_day(), 3661);
    }

    #[test]
    fn test_no_clock_unavailable() {
        let mut clock = NoClock;
        assert!(!clock.available());
        assert!(embassy_futures::block_on(clock.now()).is_err());
    }
}
