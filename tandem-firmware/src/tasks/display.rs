//! Display tasks
//!
//! One task per physical display. Both run the same loop over their own
//! `DisplaySurface`, each on its own refresh period.

use defmt::*;
use embassy_time::Ticker;
use tandem_core::surface::{DisplaySurface, TickOutcome};
use tandem_display::RenderTarget;

use crate::board::{BoardMutex, Context, PixelSurface, TextSurface};

/// Surfaces that must be running before Ready-Display is set
const SURFACE_COUNT: u8 = 2;

/// Drive the OLED
#[embassy_executor::task]
pub async fn pixel_display_task(ctx: &'static Context, mut surface: PixelSurface) {
    run(ctx, &mut surface).await;
}

/// Drive the character LCD
#[embassy_executor::task]
pub async fn text_display_task(ctx: &'static Context, mut surface: TextSurface) {
    run(ctx, &mut surface).await;
}

async fn run<T: RenderTarget>(ctx: &'static Context, surface: &mut DisplaySurface<'static, BoardMutex, T>) {
    let kind = surface.kind();
    info!("{} display task started", kind.name());
    if ctx.hub.notify_surface_ready(SURFACE_COUNT) {
        info!("All display surfaces running");
    }

    let mut ticker = Ticker::every(surface.period());

    loop {
        if ctx.hub.shutdown_requested() {
            break;
        }

        match surface.tick().await {
            TickOutcome::Idle => {}
            TickOutcome::Rendered(version) => trace!("{} drew version {}", kind.name(), version),
            TickOutcome::LockBusy => trace!("{} display lock busy", kind.name()),
            TickOutcome::Failed(e) => warn!("{} render failed: {}", kind.name(), e),
        }

        ticker.next().await;
    }

    if surface.cleanup().await {
        info!("{} display cleared", kind.name());
    } else {
        warn!("{} display cleanup failed", kind.name());
    }
}
