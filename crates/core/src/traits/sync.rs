//! Guarded shared-state abstraction.
//!
//! Both cores touch the output runtime state and the persistent log store.
//! Every access goes through [`SharedState`], whose accessors wait a bounded
//! time for the lock and hand back [`LockTimeout`] instead of blocking
//! forever, so each call site has to decide what to do under contention.
//!
//! - [`SpinState`] is the cross-core implementation (atomic spinlock with a
//!   timeout measured on a [`TimeSource`])
//! - [`MockState`] is the single-threaded `RefCell` implementation for tests

use core::cell::{RefCell, UnsafeCell};
use core::fmt;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

use super::time::TimeSource;

/// Default bound on lock waits, in microseconds.
pub const DEFAULT_LOCK_TIMEOUT_US: u64 = 100;

/// The lock could not be acquired within the allowed wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTimeout;

impl fmt::Display for LockTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mutex timeout")
    }
}

/// Lock-guarded state with bounded waits.
///
/// # Example
///
/// ```
/// use brickpico_core::traits::{MockState, SharedState};
///
/// let state = MockState::new(41u32);
/// let value = state.try_with_mut(100, |v| {
///     *v += 1;
///     *v
/// });
/// assert_eq!(value, Ok(42));
/// ```
pub trait SharedState<T> {
    /// Access state immutably, waiting at most `timeout_us` for the lock.
    fn try_with<F, R>(&self, timeout_us: u64, f: F) -> Result<R, LockTimeout>
    where
        F: FnOnce(&T) -> R;

    /// Access state mutably, waiting at most `timeout_us` for the lock.
    fn try_with_mut<F, R>(&self, timeout_us: u64, f: F) -> Result<R, LockTimeout>
    where
        F: FnOnce(&mut T) -> R;
}

impl<T, S: SharedState<T>> SharedState<T> for &S {
    fn try_with<F, R>(&self, timeout_us: u64, f: F) -> Result<R, LockTimeout>
    where
        F: FnOnce(&T) -> R,
    {
        (**self).try_with(timeout_us, f)
    }

    fn try_with_mut<F, R>(&self, timeout_us: u64, f: F) -> Result<R, LockTimeout>
    where
        F: FnOnce(&mut T) -> R,
    {
        (**self).try_with_mut(timeout_us, f)
    }
}

// ============================================================================
// Cross-core Implementation
// ============================================================================

/// Spinlock-protected state shared between cores.
///
/// The lock is a single atomic flag; waiting spins on it until the clock
/// says the timeout has passed. The lock is not re-entrant: a nested access
/// from the same core times out rather than deadlocking.
pub struct SpinState<T, C> {
    locked: AtomicBool,
    clock: C,
    inner: UnsafeCell<T>,
}

// Safety: access to `inner` is serialized by `locked`.
unsafe impl<T: Send, C: Sync> Sync for SpinState<T, C> {}

impl<T, C: TimeSource> SpinState<T, C> {
    /// Creates a new unlocked `SpinState`. Usable in statics.
    pub const fn new(value: T, clock: C) -> Self {
        Self {
            locked: AtomicBool::new(false),
            clock,
            inner: UnsafeCell::new(value),
        }
    }

    /// Mutable access without locking, available while exclusively owned.
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    /// Acquire the lock, spinning for at most `timeout_us`.
    pub fn lock_for(&self, timeout_us: u64) -> Result<SpinGuard<'_, T, C>, LockTimeout> {
        if self.try_acquire() {
            return Ok(SpinGuard { state: self });
        }

        let start = self.clock.now_us();
        loop {
            if self.try_acquire() {
                return Ok(SpinGuard { state: self });
            }
            if self.clock.elapsed_since(start) >= timeout_us {
                return Err(LockTimeout);
            }
            core::hint::spin_loop();
        }
    }

    fn try_acquire(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }
}

impl<T, C: TimeSource> SharedState<T> for SpinState<T, C> {
    fn try_with<F, R>(&self, timeout_us: u64, f: F) -> Result<R, LockTimeout>
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.lock_for(timeout_us)?;
        Ok(f(&guard))
    }

    fn try_with_mut<F, R>(&self, timeout_us: u64, f: F) -> Result<R, LockTimeout>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut guard = self.lock_for(timeout_us)?;
        Ok(f(&mut guard))
    }
}

/// Held lock on a [`SpinState`]; released on drop.
pub struct SpinGuard<'a, T, C> {
    state: &'a SpinState<T, C>,
}

impl<T, C> Deref for SpinGuard<'_, T, C> {
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: the guard owns the lock.
        unsafe { &*self.state.inner.get() }
    }
}

impl<T, C> DerefMut for SpinGuard<'_, T, C> {
    fn deref_mut(&mut self) -> &mut T {
        // Safety: the guard owns the lock.
        unsafe { &mut *self.state.inner.get() }
    }
}

impl<T, C> Drop for SpinGuard<'_, T, C> {
    fn drop(&mut self) {
        self.state.locked.store(false, Ordering::Release);
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Single-threaded state using `RefCell`.
///
/// An access while the cell is already borrowed reports [`LockTimeout`]
/// immediately, which is how contention shows up in host tests.
pub struct MockState<T> {
    inner: RefCell<T>,
}

impl<T> MockState<T> {
    /// Creates a new `MockState` wrapping the given value.
    pub fn new(value: T) -> Self {
        Self {
            inner: RefCell::new(value),
        }
    }
}

impl<T> SharedState<T> for MockState<T> {
    fn try_with<F, R>(&self, _timeout_us: u64, f: F) -> Result<R, LockTimeout>
    where
        F: FnOnce(&T) -> R,
    {
        let inner = self.inner.try_borrow().map_err(|_| LockTimeout)?;
        Ok(f(&inner))
    }

    fn try_with_mut<F, R>(&self, _timeout_us: u64, f: F) -> Result<R, LockTimeout>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut inner = self.inner.try_borrow_mut().map_err(|_| LockTimeout)?;
        Ok(f(&mut inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockTime;

    #[test]
    fn mock_state_read_modify_read() {
        let state = MockState::new(0u32);
        assert_eq!(state.try_with(100, |v| *v), Ok(0));

        state.try_with_mut(100, |v| *v += 10).unwrap();

        assert_eq!(state.try_with(100, |v| *v), Ok(10));
    }

    #[test]
    fn mock_state_nested_access_reports_timeout() {
        let state = MockState::new(0u32);

        let nested = state.try_with_mut(100, |_| state.try_with(100, |v| *v));

        assert_eq!(nested, Ok(Err(LockTimeout)));
    }

    #[test]
    fn spin_state_uncontended_access() {
        let state = SpinState::new(5u32, MockTime::new());

        state.try_with_mut(100, |v| *v *= 2).unwrap();

        assert_eq!(state.try_with(100, |v| *v), Ok(10));
    }

    #[test]
    fn spin_state_times_out_while_held() {
        let clock = MockTime::with_step(10);
        let state = SpinState::new(0u32, clock.clone());

        let guard = state.lock_for(100).unwrap();
        assert_eq!(state.try_with(100, |v| *v), Err(LockTimeout));
        drop(guard);

        assert_eq!(state.try_with(100, |v| *v), Ok(0));
    }

    #[test]
    fn spin_state_wait_is_bounded_by_timeout() {
        let clock = MockTime::with_step(10);
        let state = SpinState::new(0u32, clock);
        let _guard = state.lock_for(100).unwrap();

        let before = state.clock.now_us();
        let _ = state.try_with(100, |v| *v);
        let waited = state.clock.now_us() - before;

        // The spin ends on the first clock read past the bound.
        assert!(waited >= 100);
        assert!(waited <= 130);
    }

    #[test]
    fn spin_state_releases_lock_after_closure() {
        let state = SpinState::new(0u32, MockTime::with_step(10));

        state.try_with_mut(100, |v| *v = 1).unwrap();
        state.try_with_mut(100, |v| *v = 2).unwrap();

        assert_eq!(state.try_with(100, |v| *v), Ok(2));
    }

    #[test]
    fn spin_state_is_shared_across_threads() {
        extern crate std;
        use std::sync::Arc;

        #[derive(Clone)]
        struct StdClock;
        impl TimeSource for StdClock {
            fn now_us(&self) -> u64 {
                static START: std::sync::OnceLock<std::time::Instant> =
                    std::sync::OnceLock::new();
                START
                    .get_or_init(std::time::Instant::now)
                    .elapsed()
                    .as_micros() as u64
            }
        }

        let state = Arc::new(SpinState::new(0u32, StdClock));
        let handles: std::vec::Vec<_> = (0..4)
            .map(|_| {
                let state = Arc::clone(&state);
                std::thread::spawn(move || {
                    let mut done = 0;
                    while done < 1000 {
                        if state.try_with_mut(1_000_000, |v| *v += 1).is_ok() {
                            done += 1;
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(state.try_with(100, |v| *v), Ok(4000));
    }
}
