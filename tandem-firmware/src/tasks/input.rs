//! Input task
//!
//! Runs on the high-priority executor so a press is picked up within one
//! poll period even while a display is mid-render.

use defmt::*;
use embassy_time::{Instant, Ticker};
use tandem_core::nav::Action;

use crate::board::{Buttons, Context, Controller};

/// Sample the buttons every `input_poll_ms` and drive navigation
#[embassy_executor::task]
pub async fn input_task(ctx: &'static Context, mut controller: Controller, buttons: Buttons) {
    info!("Input task started");
    ctx.hub.notify_controller_ready();

    let mut ticker = Ticker::every(ctx.timing.input_poll());

    loop {
        if ctx.hub.shutdown_requested() {
            break;
        }

        let now_ms = Instant::now().as_millis();
        if let Some((event, action)) = controller.poll(now_ms, &buttons).await {
            debug!("Button {} -> {}", event, action);
            match action {
                Action::Enter(mode) => info!("Mode -> {}", mode.name()),
                Action::ExitConfirmed => info!("Exit confirmed, back to menu"),
                _ => {}
            }
        }

        ticker.next().await;
    }

    info!("Input task stopped");
}
