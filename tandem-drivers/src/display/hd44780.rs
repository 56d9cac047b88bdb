//! HD44780 character LCD over a PCF8574 I2C backpack
//!
//! The expander drives the LCD in 4-bit mode:
//! P0 = RS, P1 = RW, P2 = EN, P3 = backlight, P4..P7 = D4..D7.
//!
//! Characters go to the controller as they are written, so `flush` only
//! checks that the display is up.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use tandem_display::surface::{TEXT_COLS, TEXT_ROWS};
use tandem_display::{DisplayError, RenderTarget, SurfaceKind};

/// Common PCF8574 backpack address
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Expander bits
const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

/// DDRAM address of each row on a 20x4 panel
const ROW_OFFSETS: [u8; TEXT_ROWS as usize] = [0x00, 0x40, 0x14, 0x54];

/// HD44780 commands
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const ENTRY_MODE_INCREMENT: u8 = 0x06;
    pub const DISPLAY_ON: u8 = 0x0C;
    pub const DISPLAY_OFF: u8 = 0x08;
    pub const FUNCTION_4BIT_2LINE: u8 = 0x28;
    pub const SET_DDRAM: u8 = 0x80;
}

/// HD44780 LCD driver
pub struct Hd44780<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    backlight: bool,
    /// Cursor (col, row)
    cursor: (u8, u8),
    initialized: bool,
}

impl<I2C, D> Hd44780<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver for the backpack at `address`
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: true,
            cursor: (0, 0),
            initialized: false,
        }
    }

    fn control_bits(&self) -> u8 {
        if self.backlight {
            BACKLIGHT
        } else {
            0
        }
    }

    async fn expander(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, bytes)
            .await
            .map_err(|_| DisplayError::Communication)
    }

    /// Clock the upper four bits of `nibble` into the controller
    async fn write_nibble(&mut self, nibble: u8, rs: bool) -> Result<(), DisplayError> {
        let base = (nibble & 0xF0) | self.control_bits() | if rs { RS } else { 0 };
        self.expander(&[base | EN, base]).await?;
        self.delay.delay_us(50).await;
        Ok(())
    }

    async fn send(&mut self, byte: u8, rs: bool) -> Result<(), DisplayError> {
        self.write_nibble(byte & 0xF0, rs).await?;
        self.write_nibble(byte << 4, rs).await
    }

    async fn command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.send(byte, false).await
    }

    /// Switch the backlight
    pub async fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.backlight = on;
        let bits = self.control_bits();
        self.expander(&[bits]).await
    }

    fn ensure_initialized(&self) -> Result<(), DisplayError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }
}

impl<I2C, D> RenderTarget for Hd44780<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Text
    }

    async fn init(&mut self) -> Result<(), DisplayError> {
        // Power-on wait, then the datasheet's 4-bit entry sequence
        self.delay.delay_ms(50).await;
        let bits = self.control_bits();
        self.expander(&[bits]).await?;
        for _ in 0..3 {
            self.write_nibble(0x30, false).await?;
            self.delay.delay_ms(5).await;
        }
        self.write_nibble(0x20, false).await?;

        self.command(cmd::FUNCTION_4BIT_2LINE).await?;
        self.command(cmd::DISPLAY_ON).await?;
        self.command(cmd::CLEAR).await?;
        self.delay.delay_ms(2).await;
        self.command(cmd::ENTRY_MODE_INCREMENT).await?;

        self.cursor = (0, 0);
        self.initialized = true;
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.command(cmd::CLEAR).await?;
        self.delay.delay_ms(2).await;
        self.cursor = (0, 0);
        Ok(())
    }

    async fn set_cursor(&mut self, x: u16, y: u16) -> Result<(), DisplayError> {
        if x >= TEXT_COLS || y >= TEXT_ROWS {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.ensure_initialized()?;
        let (col, row) = (x as u8, y as u8);
        self.command(cmd::SET_DDRAM | (ROW_OFFSETS[row as usize] + col))
            .await?;
        self.cursor = (col, row);
        Ok(())
    }

    async fn write_text(&mut self, text: &str) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        for ch in text.chars() {
            // Stop at the edge; the controller would wrap into another row
            if self.cursor.0 as u16 >= TEXT_COLS {
                break;
            }
            let byte = if ch.is_ascii() && !ch.is_ascii_control() {
                ch as u8
            } else {
                b'?'
            };
            self.send(byte, true).await?;
            self.cursor.0 += 1;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()
    }

    async fn shutdown(&mut self) -> Result<(), DisplayError> {
        self.clear().await?;
        self.command(cmd::DISPLAY_OFF).await?;
        self.set_backlight(false).await
    }
}
