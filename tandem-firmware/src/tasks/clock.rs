//! Clock refresh task

use defmt::*;
use embassy_time::Ticker;
use tandem_hal::ClockSource;

use crate::board::{Context, SharedClock};

/// Copy the RTC into the cached time every `clock_refresh_ms`
///
/// With no RTC fitted the cached time keeps its startup value.
#[embassy_executor::task]
pub async fn clock_task(ctx: &'static Context, mut clock: SharedClock) {
    info!("Clock task started");

    let mut ticker = Ticker::every(ctx.timing.clock_refresh());
    let mut failures: u32 = 0;

    loop {
        if ctx.hub.shutdown_requested() {
            break;
        }

        if ctx.state.refresh_time(&mut clock).await {
            failures = 0;
        } else if clock.available() {
            failures = failures.saturating_add(1);
            if failures == 1 {
                warn!("RTC read failed, keeping last time");
            }
        }

        ticker.next().await;
    }

    info!("Clock task stopped");
}
