//! Tandem - Dual Display Menu Controller Firmware
//!
//! One six-button cluster drives a menu that is shown on two displays at
//! once: a 128x64 SSD1306 OLED and a 20x4 HD44780 character LCD. Both read
//! the same navigation state, each on its own refresh period.
//!
//! Startup order: hub, shared state, input controller, then each display
//! surface. Tasks are spawned once everything is up, and startup only
//! counts as done when the controller and the displays have reported ready.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{I2C0, I2C1};
use embassy_rp::spi::{self, Spi};
use embassy_rp::{bind_interrupts, Peripherals};
use embassy_sync::mutex::Mutex;
use embassy_time::{Delay, Duration};
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tandem_core::config::VERSION;
use tandem_core::input::InputController;
use tandem_core::surface::DisplaySurface;
use tandem_core::InitError;
use tandem_display::SurfaceKind;
use tandem_drivers::display::hd44780::DEFAULT_ADDRESS;
use tandem_drivers::display::{Hd44780, Ssd1306};
use tandem_drivers::rtc::Ds1307;
use tandem_hal::ActiveLow;

use crate::board::{BoardMutex, ButtonPin, Buttons, Context, Rtc, SharedClock};

mod board;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

/// OLED SPI clock
const OLED_SPI_HZ: u32 = 8_000_000;

// Built once at startup, shared by reference with every task
static CONTEXT: StaticCell<Context> = StaticCell::new();
static RTC: StaticCell<Mutex<BoardMutex, Rtc>> = StaticCell::new();

// Input runs above thread mode
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tandem firmware v{} starting...", VERSION);

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let ctx: &'static Context = CONTEXT.init(Context::new(config::TIMING, config::LOCKS));
    info!("Timing: {}", ctx.timing);

    match start(spawner, p, ctx).await {
        Ok(()) => {}
        Err(e) => {
            error!("Startup failed: {}", e);
            ctx.hub.signal_shutdown();
            let dropped = ctx.hub.cleanup();
            info!("Cleanup done, {} queued messages dropped", dropped);
            return;
        }
    }

    if ctx.hub.wait_for_system_ready(ctx.timing.ready_timeout()).await {
        info!("System ready");
    } else {
        error!(
            "Startup timed out after {}ms (flags {})",
            ctx.timing.ready_timeout_ms,
            ctx.hub.flags().bits()
        );
        ctx.hub.signal_shutdown();
        let dropped = ctx.hub.cleanup();
        info!("Cleanup done, {} queued messages dropped", dropped);
        return;
    }

    // Heartbeat until something requests shutdown
    while !ctx.hub.wait_for_shutdown(Duration::from_secs(60)).await {
        trace!("Heartbeat");
    }
    info!("Shutdown requested");
}

/// Bring up every component in order and spawn the tasks
async fn start(spawner: Spawner, p: Peripherals, ctx: &'static Context) -> Result<(), InitError> {
    // RTC on I2C0; a missing chip is not fatal
    let rtc_bus = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c::Config::default());
    let mut rtc = Ds1307::new(rtc_bus);
    let present = rtc.probe().await;
    if !present {
        warn!("No RTC on I2C0, time starts at the epoch");
    }
    let clock = SharedClock::new(RTC.init(Mutex::new(rtc)), present);

    // Hub, then shared state
    let mut seed_clock = clock;
    let seeded = ctx.initialize(&mut seed_clock).await?;
    info!("Hub and state initialized (time seeded: {})", seeded);

    // Input controller
    let buttons: Buttons = [
        ActiveLow::new(ButtonPin::from(Input::new(p.PIN_10, Pull::Up))),
        ActiveLow::new(ButtonPin::from(Input::new(p.PIN_11, Pull::Up))),
        ActiveLow::new(ButtonPin::from(Input::new(p.PIN_12, Pull::Up))),
        ActiveLow::new(ButtonPin::from(Input::new(p.PIN_13, Pull::Up))),
        ActiveLow::new(ButtonPin::from(Input::new(p.PIN_14, Pull::Up))),
        ActiveLow::new(ButtonPin::from(Input::new(p.PIN_15, Pull::Up))),
    ];
    let controller = InputController::new(&ctx.state, &ctx.hub, clock, &ctx.timing);
    info!("Input controller initialized");

    // Pixel surface: SSD1306 on SPI0
    let mut spi_config = spi::Config::default();
    spi_config.frequency = OLED_SPI_HZ;
    let spi_bus = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let spi_dev = ExclusiveDevice::new(spi_bus, cs, Delay)
        .map_err(|_| InitError::Display(SurfaceKind::Pixel))?;
    let mut pixel = DisplaySurface::new(
        Ssd1306::new(spi_dev, dc),
        &ctx.state,
        &ctx.hub,
        ctx.timing.pixel_refresh_ms,
    );
    pixel.initialize().await?;
    info!("Pixel surface initialized");

    // Text surface: HD44780 behind a PCF8574 on I2C1
    let lcd_bus = I2c::new_async(p.I2C1, p.PIN_7, p.PIN_6, Irqs, i2c::Config::default());
    let mut text = DisplaySurface::new(
        Hd44780::new(lcd_bus, Delay, DEFAULT_ADDRESS),
        &ctx.state,
        &ctx.hub,
        ctx.timing.text_refresh_ms,
    );
    text.initialize().await?;
    info!("Text surface initialized");

    // Input on the high-priority executor, everything else in thread mode
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high.spawn(tasks::input_task(ctx, controller, buttons)).map_err(|_| InitError::TaskSpawn)?;
    info!("Input task spawned");

    spawner.spawn(tasks::pixel_display_task(ctx, pixel)).map_err(|_| InitError::TaskSpawn)?;
    spawner.spawn(tasks::text_display_task(ctx, text)).map_err(|_| InitError::TaskSpawn)?;
    info!("Display tasks spawned");

    spawner.spawn(tasks::clock_task(ctx, clock)).map_err(|_| InitError::TaskSpawn)?;
    spawner.spawn(tasks::status_task(ctx)).map_err(|_| InitError::TaskSpawn)?;
    info!("Clock and status tasks spawned");

    Ok(())
}
