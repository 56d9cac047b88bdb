//! Lock-guarded navigation state
//!
//! Every accessor waits on its lock for a bounded time. When the wait
//! elapses, getters return the last published value and setters do nothing.
//! The only unbounded wait is [`SharedState::time`].
//!
//! Each mutation of `mode` or `menu_index` bumps `change_version` exactly
//! once. Observers keep their own last-seen version and compare it with
//! [`SharedState::has_changed_since`], so one observer never hides a change
//! from another.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::with_timeout;
use portable_atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
use tandem_hal::{ClockSource, DateTime};

use crate::config::{ms, LockTimeouts, MENU_COUNT};
use crate::error::{InitError, InvalidInput};
use crate::nav::{AppMode, MenuItem};

/// Consistent view of the navigation fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavigationState {
    /// Selected menu entry, always `< MENU_COUNT`
    pub menu_index: usize,
    /// Current screen
    pub mode: AppMode,
    /// Bumped on every mode or index mutation
    pub change_version: u32,
    /// Last clock reading
    pub cached_time: DateTime,
}

struct Nav {
    menu_index: usize,
    mode: AppMode,
    version: u32,
}

/// Shared navigation state
pub struct SharedState<M: RawMutex> {
    nav: Mutex<M, Nav>,
    time: Mutex<M, DateTime>,
    timeouts: LockTimeouts,
    initialized: AtomicBool,
    // Last published values, written only while the owning lock is held
    last_index: AtomicU8,
    last_mode: AtomicU8,
    last_version: AtomicU32,
    last_time: AtomicU64,
}

impl<M: RawMutex> SharedState<M> {
    /// Create state at the menu, first entry selected, version 0
    pub const fn new(timeouts: LockTimeouts) -> Self {
        Self {
            nav: Mutex::new(Nav {
                menu_index: 0,
                mode: AppMode::Menu,
                version: 0,
            }),
            time: Mutex::new(DateTime::EPOCH),
            timeouts,
            initialized: AtomicBool::new(false),
            last_index: AtomicU8::new(0),
            last_mode: AtomicU8::new(AppMode::Menu.as_u8()),
            last_version: AtomicU32::new(0),
            last_time: AtomicU64::new(pack(DateTime::EPOCH)),
        }
    }

    /// Seed the cached time from the clock
    ///
    /// Returns whether the clock provided a reading. An absent or failing
    /// clock is not an error; the cache keeps its epoch value.
    pub async fn initialize<C: ClockSource>(&self, clock: &mut C) -> Result<bool, InitError> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return Err(InitError::AlreadyInitialized);
        }
        Ok(self.refresh_time(clock).await)
    }

    /// Lock timeouts in use
    pub fn timeouts(&self) -> &LockTimeouts {
        &self.timeouts
    }

    async fn lock_nav(&self, timeout_ms: u32) -> Option<MutexGuard<'_, M, Nav>> {
        with_timeout(ms(timeout_ms), self.nav.lock()).await.ok()
    }

    /// Apply `f` under the nav lock; bump and publish if it reports a change
    async fn update(&self, f: impl FnOnce(&mut Nav) -> bool) -> bool {
        let Some(mut nav) = self.lock_nav(self.timeouts.state_write).await else {
            return false;
        };
        if !f(&mut *nav) {
            return false;
        }
        nav.version = nav.version.wrapping_add(1);
        self.last_index.store(nav.menu_index as u8, Ordering::Relaxed);
        self.last_mode.store(nav.mode.as_u8(), Ordering::Relaxed);
        self.last_version.store(nav.version, Ordering::Relaxed);
        true
    }

    /// Current screen
    pub async fn mode(&self) -> AppMode {
        match self.lock_nav(self.timeouts.state_read).await {
            Some(nav) => nav.mode,
            None => AppMode::from_u8(self.last_mode.load(Ordering::Relaxed)),
        }
    }

    /// Switch screen
    ///
    /// Returns `true` if the mode changed. Setting the current mode again
    /// leaves the version untouched.
    pub async fn set_mode(&self, mode: AppMode) -> bool {
        self.update(|nav| {
            if nav.mode == mode {
                return false;
            }
            nav.mode = mode;
            true
        })
        .await
    }

    /// Selected menu entry
    pub async fn menu_index(&self) -> usize {
        match self.lock_nav(self.timeouts.state_read).await {
            Some(nav) => nav.menu_index,
            None => self.last_index.load(Ordering::Relaxed) as usize,
        }
    }

    /// Select a menu entry
    ///
    /// Out-of-range indices are rejected without touching the state.
    /// `Ok(false)` means nothing changed (same index, or the lock was busy).
    pub async fn set_menu_index(&self, index: usize) -> Result<bool, InvalidInput> {
        if index >= MENU_COUNT {
            return Err(InvalidInput::IndexOutOfRange {
                index,
                count: MENU_COUNT,
            });
        }
        Ok(self
            .update(|nav| {
                if nav.menu_index == index {
                    return false;
                }
                nav.menu_index = index;
                true
            })
            .await)
    }

    /// Select the next entry, wrapping to the first
    pub async fn increment_menu_index(&self) -> bool {
        self.update(|nav| {
            nav.menu_index = (nav.menu_index + 1) % MENU_COUNT;
            true
        })
        .await
    }

    /// Select the previous entry, wrapping to the last
    pub async fn decrement_menu_index(&self) -> bool {
        self.update(|nav| {
            nav.menu_index = (nav.menu_index + MENU_COUNT - 1) % MENU_COUNT;
            true
        })
        .await
    }

    /// Selected menu entry as a table item
    pub async fn current_item(&self) -> Option<MenuItem> {
        MenuItem::from_index(self.menu_index().await)
    }

    /// Current change version
    pub async fn current_version(&self) -> u32 {
        match self.lock_nav(self.timeouts.change_check).await {
            Some(nav) => nav.version,
            None => self.last_version.load(Ordering::Relaxed),
        }
    }

    /// Check whether anything changed since `last_seen`
    pub async fn has_changed_since(&self, last_seen: u32) -> bool {
        self.current_version().await != last_seen
    }

    /// Read index, mode and version together, plus the cached time
    ///
    /// The three navigation fields come from one lock acquisition. The time
    /// is read afterwards without blocking; the two locks are never held
    /// at once.
    pub async fn snapshot(&self) -> NavigationState {
        let (menu_index, mode, change_version) =
            match self.lock_nav(self.timeouts.state_read).await {
                Some(nav) => (nav.menu_index, nav.mode, nav.version),
                None => (
                    self.last_index.load(Ordering::Relaxed) as usize,
                    AppMode::from_u8(self.last_mode.load(Ordering::Relaxed)),
                    self.last_version.load(Ordering::Relaxed),
                ),
            };
        NavigationState {
            menu_index,
            mode,
            change_version,
            cached_time: self.cached_time(),
        }
    }

    /// Cached time, waiting as long as it takes for the time lock
    pub async fn time(&self) -> DateTime {
        *self.time.lock().await
    }

    /// Last published time without touching the lock
    pub fn cached_time(&self) -> DateTime {
        unpack(self.last_time.load(Ordering::Relaxed))
    }

    /// Replace the cached time
    ///
    /// Returns `false` if the time lock was busy and nothing was written.
    pub async fn set_time(&self, time: DateTime) -> bool {
        let Ok(mut cached) = with_timeout(ms(self.timeouts.time_write), self.time.lock()).await
        else {
            return false;
        };
        *cached = time;
        self.last_time.store(pack(time), Ordering::Relaxed);
        true
    }

    /// Copy the clock into the cached time if the clock is usable
    ///
    /// An unavailable clock, a read error or an invalid reading keeps the
    /// last known value.
    pub async fn refresh_time<C: ClockSource>(&self, clock: &mut C) -> bool {
        if !clock.available() {
            return false;
        }
        match clock.now().await {
            Ok(now) if now.is_valid() => self.set_time(now).await,
            _ => false,
        }
    }
}

const fn pack(t: DateTime) -> u64 {
    (t.year as u64) << 40
        | (t.month as u64) << 32
        | (t.day as u64) << 24
        | (t.hour as u64) << 16
        | (t.minute as u64) << 8
        | t.second as u64
}

const fn unpack(v: u64) -> DateTime {
    DateTime::new(
        (v >> 40) as u16,
        (v >> 32) as u8,
        (v >> 24) as u8,
        (v >> 16) as u8,
        (v >> 8) as u8,
        v as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_time::{Duration, Instant, Timer};
    use proptest::prelude::*;
    use tandem_hal::NoClock;

    type State = SharedState<CriticalSectionRawMutex>;

    fn state() -> State {
        SharedState::new(LockTimeouts::DEFAULT)
    }

    struct FixedClock(DateTime);

    impl ClockSource for FixedClock {
        type Error = ();

        fn available(&self) -> bool {
            true
        }

        async fn now(&mut self) -> Result<DateTime, ()> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_initial_state() {
        let state = state();
        let snap = block_on(state.snapshot());
        assert_eq!(snap.menu_index, 0);
        assert_eq!(snap.mode, AppMode::Menu);
        assert_eq!(snap.change_version, 0);
    }

    #[test]
    fn test_initialize_once() {
        let state = state();
        assert_eq!(block_on(state.initialize(&mut NoClock)), Ok(false));
        assert_eq!(
            block_on(state.initialize(&mut NoClock)),
            Err(InitError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_initialize_seeds_time() {
        let state = state();
        let now = DateTime::new(2024, 6, 1, 12, 30, 15);
        assert_eq!(block_on(state.initialize(&mut FixedClock(now))), Ok(true));
        assert_eq!(block_on(state.time()), now);
        assert_eq!(state.cached_time(), now);
    }

    #[test]
    fn test_decrement_wraps_from_zero() {
        let state = state();
        assert!(block_on(state.decrement_menu_index()));
        assert_eq!(block_on(state.menu_index()), MENU_COUNT - 1);
        assert!(block_on(state.increment_menu_index()));
        assert_eq!(block_on(state.menu_index()), 0);
    }

    #[test]
    fn test_set_mode_bumps_version_once() {
        let state = state();
        assert!(block_on(state.set_mode(AppMode::Settings)));
        assert_eq!(block_on(state.current_version()), 1);
        assert!(!block_on(state.set_mode(AppMode::Settings)));
        assert_eq!(block_on(state.current_version()), 1);
        assert_eq!(block_on(state.mode()), AppMode::Settings);
    }

    #[test]
    fn test_set_menu_index_range() {
        let state = state();
        assert_eq!(block_on(state.set_menu_index(2)), Ok(true));
        assert_eq!(
            block_on(state.set_menu_index(MENU_COUNT)),
            Err(InvalidInput::IndexOutOfRange {
                index: MENU_COUNT,
                count: MENU_COUNT
            })
        );
        assert_eq!(block_on(state.menu_index()), 2);
        assert_eq!(block_on(state.current_item()), Some(MenuItem::About));
        assert_eq!(block_on(state.current_version()), 1);
    }

    #[test]
    fn test_independent_observers() {
        let state = state();
        let mut pixel_seen = block_on(state.current_version());
        let mut text_seen = pixel_seen;

        block_on(state.increment_menu_index());

        // Pixel surface observes and records the change first
        assert!(block_on(state.has_changed_since(pixel_seen)));
        pixel_seen = block_on(state.current_version());
        assert!(!block_on(state.has_changed_since(pixel_seen)));

        // Text surface still sees it, exactly once
        assert!(block_on(state.has_changed_since(text_seen)));
        text_seen = block_on(state.current_version());
        assert!(!block_on(state.has_changed_since(text_seen)));
    }

    #[test]
    fn test_time_read_waits_for_holder() {
        let state = state();
        let earlier = DateTime::new(2024, 1, 1, 8, 0, 0);
        let later = DateTime::new(2024, 1, 1, 9, 15, 0);
        assert!(block_on(state.set_time(earlier)));

        let hold = Duration::from_millis(LockTimeouts::DEFAULT.time_write as u64 * 3);
        let mut guard = block_on(state.time.lock());
        let start = Instant::now();
        let (_, got) = block_on(join(
            async move {
                Timer::after(hold).await;
                *guard = later;
                drop(guard);
            },
            state.time(),
        ));
        assert_eq!(got, later);
        assert!(start.elapsed() >= hold);
    }

    #[test]
    fn test_contended_reads_return_cached_values() {
        let state = state();
        block_on(state.set_mode(AppMode::About));
        block_on(state.increment_menu_index());

        let guard = block_on(state.nav.lock());
        let start = Instant::now();
        assert_eq!(block_on(state.mode()), AppMode::About);
        assert_eq!(block_on(state.menu_index()), 1);
        assert_eq!(block_on(state.current_version()), 2);
        let snap = block_on(state.snapshot());
        assert_eq!((snap.menu_index, snap.mode), (1, AppMode::About));
        assert!(start.elapsed() < Duration::from_millis(500));
        drop(guard);
    }

    #[test]
    fn test_contended_writes_are_dropped_within_timeout() {
        let state = state();
        let guard = block_on(state.nav.lock());
        let start = Instant::now();
        assert!(!block_on(state.set_mode(AppMode::Settings)));
        assert!(!block_on(state.increment_menu_index()));
        assert!(start.elapsed() < Duration::from_millis(1000));
        drop(guard);

        assert_eq!(block_on(state.mode()), AppMode::Menu);
        assert_eq!(block_on(state.current_version()), 0);
    }

    #[test]
    fn test_contended_time_write_keeps_last_value() {
        let state = state();
        let first = DateTime::new(2024, 1, 1, 8, 0, 0);
        assert!(block_on(state.set_time(first)));

        let guard = block_on(state.time.lock());
        assert!(!block_on(state.set_time(DateTime::new(2024, 1, 1, 9, 0, 0))));
        assert_eq!(block_on(state.snapshot()).cached_time, first);
        drop(guard);

        assert_eq!(block_on(state.time()), first);
    }

    #[test]
    fn test_unavailable_clock_keeps_time() {
        let state = state();
        let known = DateTime::new(2023, 12, 31, 23, 59, 59);
        block_on(state.set_time(known));
        assert!(!block_on(state.refresh_time(&mut NoClock)));
        assert_eq!(block_on(state.time()), known);
    }

    #[test]
    fn test_time_pack_roundtrip() {
        let t = DateTime::new(2099, 12, 31, 23, 59, 58);
        assert_eq!(unpack(pack(t)), t);
    }

    proptest! {
        #[test]
        fn prop_menu_index_stays_in_range(steps in proptest::collection::vec(any::<bool>(), 0..64)) {
            let state = state();
            let mut expected = 0usize;
            for up in steps {
                if up {
                    block_on(state.increment_menu_index());
                    expected = (expected + 1) % MENU_COUNT;
                } else {
                    block_on(state.decrement_menu_index());
                    expected = (expected + MENU_COUNT - 1) % MENU_COUNT;
                }
                let index = block_on(state.menu_index());
                prop_assert!(index < MENU_COUNT);
                prop_assert_eq!(index, expected);
            }
        }
    }
}
