//! System status monitor
//!
//! Drains the message queue, warns when it backs up, and prints a status
//! line every `status_interval_ms`. When Shutdown-Requested is raised it
//! runs the hub cleanup and exits.

use defmt::*;
use embassy_time::{Duration, Instant};
use tandem_core::config::{MESSAGE_QUEUE_CAPACITY, QUEUE_WARN_DEPTH};
use tandem_core::sync::{SystemEvent, SystemMessage};

use crate::board::Context;

/// Longest single wait on the queue, bounds shutdown latency
const RECEIVE_SLICE: Duration = Duration::from_millis(100);

#[embassy_executor::task]
pub async fn status_task(ctx: &'static Context) {
    info!("Status task started");

    let interval = ctx.timing.status_interval();
    let mut next_report = Instant::now() + interval;
    let mut backed_up = false;

    loop {
        if ctx.hub.shutdown_requested() {
            break;
        }

        let depth = ctx.hub.message_count();
        if depth > QUEUE_WARN_DEPTH && !backed_up {
            warn!("Message queue backing up: {}/{}", depth, MESSAGE_QUEUE_CAPACITY);
        }
        backed_up = depth > QUEUE_WARN_DEPTH;

        let wait = next_report
            .saturating_duration_since(Instant::now())
            .min(RECEIVE_SLICE);
        if let Ok(message) = ctx.hub.receive(wait).await {
            log_message(&message);
        }

        if Instant::now() >= next_report {
            report(ctx).await;
            next_report += interval;
        }
    }

    let dropped = ctx.hub.cleanup();
    info!("Shutdown cleanup done, {} queued messages dropped", dropped);
}

fn log_message(message: &SystemMessage) {
    match message {
        SystemMessage::StateChange { mode, version } => {
            debug!("State change: {} (version {})", mode.name(), version)
        }
        SystemMessage::ButtonEvent(event) => trace!("Button: {}", event),
        SystemMessage::DisplayUpdate { surface, version } => {
            trace!("{} drew version {}", surface.name(), version)
        }
        SystemMessage::SystemEvent(SystemEvent::ExitConfirmed) => info!("Exit confirmed"),
        SystemMessage::SystemEvent(event) => info!("System event: {}", event),
    }
}

async fn report(ctx: &'static Context) {
    let view = ctx.state.snapshot().await;
    let uptime = Instant::now().as_secs();
    let time = ctx.state.time().await.full_string();

    let printed = ctx
        .hub
        .serialized(|| {
            info!(
                "Up {}s | mode {} | item {} | version {} | {}",
                uptime,
                view.mode.name(),
                view.menu_index,
                view.change_version,
                time.as_str()
            )
        })
        .await;
    if printed.is_none() {
        trace!("Status line dropped, output busy");
    }
}
