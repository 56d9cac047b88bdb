//! DS1307 real-time clock
//!
//! Seven BCD timekeeping registers starting at 0x00. Bit 7 of the seconds
//! register is the clock-halt flag; it is set on a fresh chip until the
//! time is written.

use embedded_hal_async::i2c::I2c;
use tandem_hal::{ClockSource, DateTime};

/// Fixed DS1307 I2C address
pub const DS1307_ADDR: u8 = 0x68;

/// Register map
mod reg {
    pub const SECONDS: u8 = 0x00;
}

const CLOCK_HALT: u8 = 0x80;
const HOUR_12: u8 = 0x40;
const HOUR_PM: u8 = 0x20;

/// DS1307 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError {
    /// I2C transfer failed
    Bus,
    /// Oscillator halted; time was never set
    Halted,
    /// Registers held an impossible date
    InvalidTime,
}

fn bcd_to_bin(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

fn bin_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Decode the seven timekeeping registers
fn decode(regs: &[u8; 7]) -> Result<DateTime, RtcError> {
    if regs[0] & CLOCK_HALT != 0 {
        return Err(RtcError::Halted);
    }
    let hour = if regs[2] & HOUR_12 != 0 {
        let h = bcd_to_bin(regs[2] & 0x1F) % 12;
        if regs[2] & HOUR_PM != 0 {
            h + 12
        } else {
            h
        }
    } else {
        bcd_to_bin(regs[2] & 0x3F)
    };
    let time = DateTime::new(
        2000 + bcd_to_bin(regs[6]) as u16,
        bcd_to_bin(regs[5] & 0x1F),
        bcd_to_bin(regs[4] & 0x3F),
        hour,
        bcd_to_bin(regs[1] & 0x7F),
        bcd_to_bin(regs[0] & 0x7F),
    );
    if time.is_valid() {
        Ok(time)
    } else {
        Err(RtcError::InvalidTime)
    }
}

/// Encode a timestamp as register write (pointer byte first), 24-hour mode
fn encode(time: &DateTime) -> [u8; 8] {
    [
        reg::SECONDS,
        bin_to_bcd(time.second),
        bin_to_bcd(time.minute),
        bin_to_bcd(time.hour),
        1, // Day of week, unused
        bin_to_bcd(time.day),
        bin_to_bcd(time.month),
        bin_to_bcd((time.year.saturating_sub(2000) % 100) as u8),
    ]
}

/// DS1307 driver
pub struct Ds1307<I2C> {
    i2c: I2C,
    present: bool,
}

impl<I2C: I2c> Ds1307<I2C> {
    /// Create a driver; call [`Ds1307::probe`] before use
    pub fn new(i2c: I2C) -> Self {
        Self { i2c, present: false }
    }

    /// Check whether the chip answers on the bus
    pub async fn probe(&mut self) -> bool {
        let mut seconds = [0u8; 1];
        self.present = self
            .i2c
            .write_read(DS1307_ADDR, &[reg::SECONDS], &mut seconds)
            .await
            .is_ok();
        self.present
    }

    /// Set the time and start the oscillator
    pub async fn set(&mut self, time: &DateTime) -> Result<(), RtcError> {
        if !time.is_valid() {
            return Err(RtcError::InvalidTime);
        }
        self.i2c
            .write(DS1307_ADDR, &encode(time))
            .await
            .map_err(|_| RtcError::Bus)
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> ClockSource for Ds1307<I2C> {
    type Error = RtcError;

    fn available(&self) -> bool {
        self.present
    }

    async fn now(&mut self) -> Result<DateTime, RtcError> {
        let mut regs = [0u8; 7];
        self.i2c
            .write_read(DS1307_ADDR, &[reg::SECONDS], &mut regs)
            .await
            .map_err(|_| RtcError::Bus)?;
        decode(&regs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_hal_async::i2c::{ErrorKind, ErrorType, Operation};

    /// Register-file model of the chip
    struct MockRtc {
        regs: [u8; 8],
        pointer: usize,
        connected: bool,
    }

    impl MockRtc {
        fn with_regs(regs: [u8; 8]) -> Self {
            Self {
                regs,
                pointer: 0,
                connected: true,
            }
        }
    }

    impl ErrorType for MockRtc {
        type Error = ErrorKind;
    }

    impl I2c for MockRtc {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), ErrorKind> {
            if !self.connected || address != DS1307_ADDR {
                return Err(ErrorKind::Other);
            }
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(buf) => {
                        if let Some((&ptr, data)) = buf.split_first() {
                            self.pointer = ptr as usize;
                            for &byte in data {
                                self.regs[self.pointer % 8] = byte;
                                self.pointer += 1;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for byte in buf.iter_mut() {
                            *byte = self.regs[self.pointer % 8];
                            self.pointer += 1;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_bcd() {
        assert_eq!(bcd_to_bin(0x59), 59);
        assert_eq!(bin_to_bcd(47), 0x47);
    }

    #[test]
    fn test_read_time() {
        let mut rtc = Ds1307::new(MockRtc::with_regs([0x15, 0x30, 0x12, 0x03, 0x01, 0x06, 0x24, 0x00]));
        assert!(block_on(rtc.probe()));
        assert!(rtc.available());
        assert_eq!(
            block_on(rtc.now()),
            Ok(DateTime::new(2024, 6, 1, 12, 30, 15))
        );
    }

    #[test]
    fn test_twelve_hour_mode() {
        // 11 PM in 12-hour mode
        let regs = [0x00, 0x00, HOUR_12 | HOUR_PM | 0x11, 0x01, 0x01, 0x01, 0x24];
        assert_eq!(decode(&regs).map(|t| t.hour), Ok(23));
    }

    #[test]
    fn test_halted_clock() {
        let mut rtc = Ds1307::new(MockRtc::with_regs([0x80, 0, 0, 1, 1, 1, 0, 0]));
        assert_eq!(block_on(rtc.now()), Err(RtcError::Halted));
    }

    #[test]
    fn test_set_then_read() {
        let mut rtc = Ds1307::new(MockRtc::with_regs([0x80, 0, 0, 1, 1, 1, 0, 0]));
        let time = DateTime::new(2031, 12, 24, 18, 5, 9);
        block_on(rtc.set(&time)).unwrap();
        assert_eq!(block_on(rtc.now()), Ok(time));
    }

    #[test]
    fn test_absent_chip() {
        let mut bus = MockRtc::with_regs([0; 8]);
        bus.connected = false;
        let mut rtc = Ds1307::new(bus);
        assert!(!block_on(rtc.probe()));
        assert!(!rtc.available());
        assert_eq!(block_on(rtc.now()), Err(RtcError::Bus));
    }
}
