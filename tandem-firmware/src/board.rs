//! Board wiring for a Raspberry Pi Pico
//!
//! | Function                     | Pins                                     |
//! |------------------------------|------------------------------------------|
//! | Up, Down, Left, Right        | GP10, GP11, GP12, GP13 (pull-up, to GND) |
//! | Select 1, Select 2           | GP14, GP15 (pull-up, to GND)             |
//! | SSD1306 OLED (SPI0)          | SCK GP18, MOSI GP19, CS GP17, DC GP16    |
//! | HD44780 LCD backpack (I2C1)  | SDA GP6, SCL GP7                         |
//! | DS1307 RTC (I2C0)            | SDA GP4, SCL GP5                         |

use embassy_rp::gpio::{Input, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, I2C1, SPI0};
use embassy_rp::spi::{self, Spi};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{with_timeout, Delay, Duration};
use embedded_hal_bus::spi::ExclusiveDevice;
use tandem_core::config::BUTTON_COUNT;
use tandem_core::input::InputController;
use tandem_core::surface::DisplaySurface;
use tandem_drivers::display::{Hd44780, Ssd1306};
use tandem_drivers::rtc::{Ds1307, RtcError};
use tandem_hal::{ActiveLow, ClockSource, DateTime, InputPin};

/// Raw mutex shared by every lock in the firmware
pub type BoardMutex = CriticalSectionRawMutex;

/// Process-wide context
pub type Context = tandem_core::Context<BoardMutex>;

/// OLED on SPI0 with a dedicated chip select
pub type Oled = Ssd1306<ExclusiveDevice<Spi<'static, SPI0, spi::Async>, Output<'static>, Delay>, Output<'static>>;

/// Character LCD on I2C1
pub type Lcd = Hd44780<I2c<'static, I2C1, i2c::Async>, Delay>;

/// RTC on I2C0
pub type Rtc = Ds1307<I2c<'static, I2C0, i2c::Async>>;

/// Button inputs in `ButtonId` order
pub type Buttons = [ActiveLow<ButtonPin>; BUTTON_COUNT];

pub type Controller = InputController<'static, BoardMutex, SharedClock>;
pub type PixelSurface = DisplaySurface<'static, BoardMutex, Oled>;
pub type TextSurface = DisplaySurface<'static, BoardMutex, Lcd>;

/// Pull-up button input
pub struct ButtonPin(Input<'static>);

impl From<Input<'static>> for ButtonPin {
    fn from(input: Input<'static>) -> Self {
        Self(input)
    }
}

impl InputPin for ButtonPin {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Longest wait for the RTC bus before a read counts as failed
const RTC_LOCK_TIMEOUT: Duration = Duration::from_millis(50);

/// The RTC, shared between the input task (time snapshots) and the clock task
#[derive(Clone, Copy)]
pub struct SharedClock {
    rtc: &'static Mutex<BoardMutex, Rtc>,
    present: bool,
}

impl SharedClock {
    /// `present` is the probe result taken at startup
    pub fn new(rtc: &'static Mutex<BoardMutex, Rtc>, present: bool) -> Self {
        Self { rtc, present }
    }
}

impl ClockSource for SharedClock {
    type Error = RtcError;

    fn available(&self) -> bool {
        self.present
    }

    async fn now(&mut self) -> Result<DateTime, RtcError> {
        let mut rtc = with_timeout(RTC_LOCK_TIMEOUT, self.rtc.lock())
            .await
            .map_err(|_| RtcError::Bus)?;
        rtc.now().await
    }
}
