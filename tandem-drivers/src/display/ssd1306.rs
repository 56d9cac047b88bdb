//! SSD1306 OLED Display Driver
//!
//! Driver for 128x64 SSD1306-based OLED displays via 4-wire SPI.
//! Text is drawn into a page-organized frame buffer with `embedded-graphics`
//! using the 6x10 monospace font (21 chars x 6 rows).

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiDevice;
use tandem_display::{DisplayError, RenderTarget, SurfaceKind};

/// Display dimensions
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// SSD1306 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_RESUME: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_COLUMN_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Initialization sequence (internal charge pump, horizontal addressing)
const INIT_SEQUENCE: &[u8] = &[
    cmd::DISPLAY_OFF,
    cmd::SET_CLOCK_DIV,
    0x80,
    cmd::SET_MUX_RATIO,
    0x3F, // 64 lines
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_CHARGE_PUMP,
    0x14,
    cmd::SET_MEMORY_MODE,
    0x00, // Horizontal
    cmd::SET_SEG_REMAP,
    cmd::SET_COM_SCAN_DEC,
    cmd::SET_COM_PINS,
    0x12,
    cmd::SET_CONTRAST,
    0xCF,
    cmd::SET_PRECHARGE,
    0xF1,
    cmd::SET_VCOM_DETECT,
    0x40,
    cmd::DISPLAY_RESUME,
    cmd::SET_NORMAL,
    cmd::DISPLAY_ON,
];

/// 1bpp frame buffer organized as 8 pages of 128 columns
pub struct FrameBuffer {
    pages: [[u8; WIDTH]; PAGES],
}

impl FrameBuffer {
    /// Create a blank buffer
    pub const fn new() -> Self {
        Self {
            pages: [[0; WIDTH]; PAGES],
        }
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        for page in self.pages.iter_mut() {
            page.fill(0);
        }
    }

    /// Read one pixel
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.pages[y / 8][x] & (1 << (y % 8)) != 0
    }

    /// Count of lit pixels
    pub fn lit(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|page| page.iter())
            .map(|byte| byte.count_ones() as usize)
            .sum()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            if x >= WIDTH || y >= HEIGHT {
                continue;
            }
            let bit = 1 << (y % 8);
            let byte = &mut self.pages[y / 8][x];
            if color.is_on() {
                *byte |= bit;
            } else {
                *byte &= !bit;
            }
        }
        Ok(())
    }
}

/// SSD1306 OLED driver
pub struct Ssd1306<SPI, DC> {
    spi: SPI,
    /// Data/command select (low = command)
    dc: DC,
    frame: FrameBuffer,
    cursor: Point,
    initialized: bool,
}

impl<SPI, DC> Ssd1306<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Create a new SSD1306 driver
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self {
            spi,
            dc,
            frame: FrameBuffer::new(),
            cursor: Point::zero(),
            initialized: false,
        }
    }

    /// Frame buffer contents
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Send a command sequence
    async fn commands(&mut self, cmds: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Communication)?;
        self.spi
            .write(cmds)
            .await
            .map_err(|_| DisplayError::Communication)
    }

    /// Set display contrast (0-255)
    pub async fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.commands(&[cmd::SET_CONTRAST, contrast]).await
    }

    fn ensure_initialized(&self) -> Result<(), DisplayError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }
}

impl<SPI, DC> RenderTarget for Ssd1306<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Pixel
    }

    async fn init(&mut self) -> Result<(), DisplayError> {
        self.commands(INIT_SEQUENCE).await?;
        self.frame.clear();
        self.cursor = Point::zero();
        self.initialized = true;
        self.flush().await
    }

    async fn clear(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.frame.clear();
        self.cursor = Point::zero();
        Ok(())
    }

    async fn set_cursor(&mut self, x: u16, y: u16) -> Result<(), DisplayError> {
        if x as usize >= WIDTH || y as usize >= HEIGHT {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.cursor = Point::new(x as i32, y as i32);
        Ok(())
    }

    async fn write_text(&mut self, text: &str) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let next = Text::with_baseline(text, self.cursor, style, Baseline::Top)
            .draw(&mut self.frame)
            .unwrap_or_else(|never| match never {});
        self.cursor = next;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.commands(&[
            cmd::SET_COLUMN_ADDR,
            0,
            (WIDTH - 1) as u8,
            cmd::SET_PAGE_ADDR,
            0,
            (PAGES - 1) as u8,
        ])
        .await?;

        self.dc.set_high().map_err(|_| DisplayError::Communication)?;
        for page in self.frame.pages.iter() {
            self.spi
                .write(page)
                .await
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), DisplayError> {
        self.clear().await?;
        self.flush().await?;
        self.commands(&[cmd::DISPLAY_OFF]).await
    }
}
