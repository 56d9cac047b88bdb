//! Synchronization hub
//!
//! Owns the three named locks, the message queue and the event flags. Every
//! wait is bounded by a caller-supplied or configured timeout; a timeout is
//! reported as an error and the caller skips its cycle.
//!
//! No code path holds two hub locks at once.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::{with_timeout, Duration};
use portable_atomic::{AtomicBool, AtomicU8, Ordering};

use super::flags::{EventBits, EventGroup};
use super::message::{SystemEvent, SystemMessage};
use crate::config::{ms, LockTimeouts, MESSAGE_QUEUE_CAPACITY};
use crate::error::{InitError, SyncError};
use crate::nav::AppMode;

/// Named hub locks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockId {
    /// Serialized diagnostic output
    Output,
    /// Physical display access
    Display,
    /// Coarse state access for callers outside `SharedState`
    State,
}

/// Both readiness bits
const SYSTEM_READY: EventBits = EventBits::READY_DISPLAY.union(EventBits::READY_CONTROLLER);

/// Synchronization hub
pub struct SyncHub<M: RawMutex> {
    output: Mutex<M, ()>,
    display: Mutex<M, ()>,
    state: Mutex<M, ()>,
    queue: Channel<M, SystemMessage, MESSAGE_QUEUE_CAPACITY>,
    flags: EventGroup<M>,
    timeouts: LockTimeouts,
    initialized: AtomicBool,
    surfaces_running: AtomicU8,
}

impl<M: RawMutex> SyncHub<M> {
    /// Create a hub; call [`SyncHub::initialize`] before starting tasks
    pub const fn new(timeouts: LockTimeouts) -> Self {
        Self {
            output: Mutex::new(()),
            display: Mutex::new(()),
            state: Mutex::new(()),
            queue: Channel::new(),
            flags: EventGroup::new(),
            timeouts,
            initialized: AtomicBool::new(false),
            surfaces_running: AtomicU8::new(0),
        }
    }

    /// Bring the hub to a clean state
    ///
    /// Fails if the hub was already initialized; startup must not continue
    /// with a hub another caller is using.
    pub fn initialize(&self) -> Result<(), InitError> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return Err(InitError::AlreadyInitialized);
        }
        self.flags.clear(EventBits::all());
        self.queue.clear();
        self.surfaces_running.store(0, Ordering::Release);
        Ok(())
    }

    /// Whether `initialize` has run
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Lock timeouts in use
    pub fn timeouts(&self) -> &LockTimeouts {
        &self.timeouts
    }

    /// Acquire a named lock, waiting at most `timeout`
    pub async fn lock(&self, id: LockId, timeout: Duration) -> Result<MutexGuard<'_, M, ()>, SyncError> {
        let mutex = match id {
            LockId::Output => &self.output,
            LockId::Display => &self.display,
            LockId::State => &self.state,
        };
        with_timeout(timeout, mutex.lock())
            .await
            .map_err(|_| SyncError::LockTimeout)
    }

    /// Acquire the display lock with the configured timeout
    pub async fn lock_display(&self) -> Result<MutexGuard<'_, M, ()>, SyncError> {
        self.lock(LockId::Display, ms(self.timeouts.display)).await
    }

    /// Run `f` while holding the output lock
    ///
    /// Output from concurrent tasks never interleaves. Returns `None`, and
    /// skips `f`, if the lock is not acquired in time.
    pub async fn serialized<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let _guard = self
            .lock(LockId::Output, ms(self.timeouts.output))
            .await
            .ok()?;
        Some(f())
    }

    /// Queue a message, waiting at most `timeout` for room
    pub async fn send(&self, message: SystemMessage, timeout: Duration) -> Result<(), SyncError> {
        with_timeout(timeout, self.queue.send(message))
            .await
            .map_err(|_| SyncError::Timeout)
    }

    /// Queue a message without waiting; a full queue drops it
    pub fn try_send(&self, message: SystemMessage) -> Result<(), SyncError> {
        self.queue.try_send(message).map_err(|_| SyncError::QueueFull)
    }

    /// Take the next message, waiting at most `timeout`
    pub async fn receive(&self, timeout: Duration) -> Result<SystemMessage, SyncError> {
        with_timeout(timeout, self.queue.receive())
            .await
            .map_err(|_| SyncError::Timeout)
    }

    /// Take the next message if one is queued
    pub fn try_receive(&self) -> Option<SystemMessage> {
        self.queue.try_receive().ok()
    }

    /// Messages currently queued
    pub fn message_count(&self) -> usize {
        self.queue.len()
    }

    /// Event flags
    pub fn flags(&self) -> &EventGroup<M> {
        &self.flags
    }

    /// Set event bits
    pub fn set_bits(&self, bits: EventBits) -> EventBits {
        self.flags.set(bits)
    }

    /// Clear event bits
    pub fn clear_bits(&self, bits: EventBits) -> EventBits {
        self.flags.clear(bits)
    }

    /// Wait for any of `mask`
    pub async fn wait_any(&self, mask: EventBits, timeout: Duration) -> Result<EventBits, SyncError> {
        self.flags.wait_any(mask, timeout).await
    }

    /// Wait for all of `mask`
    pub async fn wait_all(&self, mask: EventBits, timeout: Duration) -> Result<EventBits, SyncError> {
        self.flags.wait_all(mask, timeout).await
    }

    /// Readiness barrier: both the controller and the displays reported ready
    ///
    /// The bits are not cleared on success, so later calls succeed at once.
    pub async fn wait_for_system_ready(&self, timeout: Duration) -> bool {
        self.flags.wait_all(SYSTEM_READY, timeout).await.is_ok()
    }

    /// Report the input controller as running
    pub fn notify_controller_ready(&self) {
        self.flags.set(EventBits::READY_CONTROLLER);
        let _ = self.try_send(SystemMessage::SystemEvent(SystemEvent::ControllerReady));
    }

    /// Report the displays as initialized
    pub fn notify_display_ready(&self) {
        self.flags.set(EventBits::READY_DISPLAY);
        let _ = self.try_send(SystemMessage::SystemEvent(SystemEvent::DisplayReady));
    }

    /// Report one display surface as running
    ///
    /// Ready-Display is set once `expected` surfaces have reported. Returns
    /// `true` for the report that completed the set.
    pub fn notify_surface_ready(&self, expected: u8) -> bool {
        let running = self.surfaces_running.fetch_add(1, Ordering::AcqRel) + 1;
        if running == expected {
            self.notify_display_ready();
            true
        } else {
            false
        }
    }

    /// Record a navigation change
    ///
    /// Sets the state-changed bit and queues a `StateChange` message.
    /// Returns `false` if the message was dropped.
    pub fn notify_state_change(&self, mode: AppMode, version: u32) -> bool {
        self.flags.set(EventBits::STATE_CHANGED);
        self.try_send(SystemMessage::StateChange { mode, version }).is_ok()
    }

    /// Ask every task to stop at its next tick
    pub fn signal_shutdown(&self) {
        self.flags.set(EventBits::SHUTDOWN_REQUESTED);
        let _ = self.try_send(SystemMessage::SystemEvent(SystemEvent::ShutdownRequested));
    }

    /// Whether shutdown was requested
    pub fn shutdown_requested(&self) -> bool {
        self.flags.bits().contains(EventBits::SHUTDOWN_REQUESTED)
    }

    /// Wait for a shutdown request, at most `timeout`
    pub async fn wait_for_shutdown(&self, timeout: Duration) -> bool {
        self.flags
            .wait_any(EventBits::SHUTDOWN_REQUESTED, timeout)
            .await
            .is_ok()
    }

    /// Orderly shutdown of the hub
    ///
    /// Leaves the shutdown bit set so running tasks exit, clears every other
    /// bit and drops queued messages. Returns how many were dropped.
    pub fn cleanup(&self) -> usize {
        self.flags.set(EventBits::SHUTDOWN_REQUESTED);
        self.flags.clear(EventBits::all().difference(EventBits::SHUTDOWN_REQUESTED));
        let mut dropped = 0;
        while self.queue.try_receive().is_ok() {
            dropped += 1;
        }
        dropped
    }
}
