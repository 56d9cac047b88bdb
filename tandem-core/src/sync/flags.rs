//! Event flag group
//!
//! A small set of named bits that tasks can set, clear and wait on. Waits
//! are level-triggered: a bit that is already set satisfies a wait at once.

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::Poll;

use bitflags::bitflags;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::waitqueue::MultiWakerRegistration;
use embassy_time::{with_timeout, Duration};

use crate::error::SyncError;

bitflags! {
    /// System event bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EventBits: u8 {
        /// Navigation state was mutated
        const STATE_CHANGED = 1 << 0;
        /// Displays are initialized
        const READY_DISPLAY = 1 << 1;
        /// Input controller is running
        const READY_CONTROLLER = 1 << 2;
        /// Orderly shutdown was requested
        const SHUTDOWN_REQUESTED = 1 << 3;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EventBits {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "EventBits({=u8:#x})", self.bits());
    }
}

/// Max concurrent waiters before earlier ones are woken to re-register
const MAX_WAITERS: usize = 4;

struct Inner {
    bits: EventBits,
    waiters: MultiWakerRegistration<MAX_WAITERS>,
}

/// Event flag group
pub struct EventGroup<M: RawMutex> {
    inner: BlockingMutex<M, RefCell<Inner>>,
}

impl<M: RawMutex> EventGroup<M> {
    /// Create a group with every bit clear
    pub const fn new() -> Self {
        Self {
            inner: BlockingMutex::new(RefCell::new(Inner {
                bits: EventBits::empty(),
                waiters: MultiWakerRegistration::new(),
            })),
        }
    }

    /// Current bits
    pub fn bits(&self) -> EventBits {
        self.inner.lock(|inner| inner.borrow().bits)
    }

    /// Set bits and wake waiters; returns the resulting bits
    pub fn set(&self, bits: EventBits) -> EventBits {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            inner.bits |= bits;
            inner.waiters.wake();
            inner.bits
        })
    }

    /// Clear bits; returns the resulting bits
    pub fn clear(&self, bits: EventBits) -> EventBits {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            inner.bits.remove(bits);
            inner.bits
        })
    }

    /// Wait until any bit in `mask` is set
    ///
    /// Returns the bits observed, or `SyncError::Timeout`.
    pub async fn wait_any(&self, mask: EventBits, timeout: Duration) -> Result<EventBits, SyncError> {
        with_timeout(timeout, self.wait(mask, false))
            .await
            .map_err(|_| SyncError::Timeout)
    }

    /// Wait until every bit in `mask` is set
    pub async fn wait_all(&self, mask: EventBits, timeout: Duration) -> Result<EventBits, SyncError> {
        with_timeout(timeout, self.wait(mask, true))
            .await
            .map_err(|_| SyncError::Timeout)
    }

    async fn wait(&self, mask: EventBits, all: bool) -> EventBits {
        poll_fn(|cx| {
            self.inner.lock(|inner| {
                let mut inner = inner.borrow_mut();
                let satisfied = if all {
                    inner.bits.contains(mask)
                } else {
                    inner.bits.intersects(mask)
                };
                if satisfied {
                    Poll::Ready(inner.bits)
                } else {
                    inner.waiters.register(cx.waker());
                    Poll::Pending
                }
            })
        })
        .await
    }
}

impl<M: RawMutex> Default for EventGroup<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_time::Timer;

    type Group = EventGroup<CriticalSectionRawMutex>;

    #[test]
    fn test_set_and_clear() {
        let group = Group::new();
        assert_eq!(group.set(EventBits::READY_DISPLAY), EventBits::READY_DISPLAY);
        group.set(EventBits::STATE_CHANGED);
        assert_eq!(group.clear(EventBits::STATE_CHANGED), EventBits::READY_DISPLAY);
    }

    #[test]
    fn test_wait_all_needs_every_bit() {
        let group = Group::new();
        let mask = EventBits::READY_DISPLAY | EventBits::READY_CONTROLLER;
        group.set(EventBits::READY_DISPLAY);
        assert_eq!(
            block_on(group.wait_all(mask, Duration::from_millis(5))),
            Err(SyncError::Timeout)
        );
        group.set(EventBits::READY_CONTROLLER);
        assert_eq!(block_on(group.wait_all(mask, Duration::from_millis(5))), Ok(mask));
    }

    #[test]
    fn test_wait_any_zero_timeout() {
        let group = Group::new();
        assert_eq!(
            block_on(group.wait_any(EventBits::SHUTDOWN_REQUESTED, Duration::from_ticks(0))),
            Err(SyncError::Timeout)
        );
        group.set(EventBits::SHUTDOWN_REQUESTED);
        assert!(block_on(group.wait_any(EventBits::SHUTDOWN_REQUESTED, Duration::from_ticks(0))).is_ok());
    }

    #[test]
    fn test_waiter_woken_by_setter() {
        let group = Group::new();
        let (result, _) = block_on(join(
            group.wait_any(EventBits::STATE_CHANGED, Duration::from_secs(2)),
            async {
                Timer::after_millis(5).await;
                group.set(EventBits::STATE_CHANGED);
            },
        ));
        assert_eq!(result, Ok(EventBits::STATE_CHANGED));
    }
}
