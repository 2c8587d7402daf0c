//! Logger facade
//!
//! One [`Logger`] instance is shared by both cores. Each call is filtered
//! against two thresholds (console and remote), timestamped with the
//! monotonic clock and the calling core, then fanned out:
//!
//! - console: always, when within the console threshold
//! - persistent store: same lines, under a bounded lock wait
//! - remote sink: when within the remote (syslog) threshold
//!
//! Thresholds are atomics so either core can change them at runtime.

use core::borrow::BorrowMut;
use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use super::line::{format_line, format_message, timestamp};
use super::persistent::{PersistentLogStore, PersistentMemoryBlock};
use super::priority::LogPriority;
use crate::traits::sync::DEFAULT_LOCK_TIMEOUT_US;
use crate::traits::{CoreId, LockTimeout, MockState, SharedState, SpinState, TimeSource};

/// Calls slower than this are reported in debug builds (microseconds)
pub const SLOW_LOG_US: u64 = 10_000;

/// Local console output
pub trait ConsoleSink {
    /// Print one line; the sink adds the line terminator.
    fn write_line(&self, args: fmt::Arguments<'_>);

    /// Print without a terminator.
    fn write(&self, args: fmt::Arguments<'_>);
}

/// Remote log forwarding (syslog collaborator)
pub trait RemoteSink {
    /// Forward a message; must not block.
    fn send(&self, priority: LogPriority, message: &str);
}

/// No remote forwarding
impl RemoteSink for () {
    fn send(&self, _priority: LogPriority, _message: &str) {}
}

/// Lock-guarded destination for stored log lines
pub trait LogPersistence {
    /// Append a line, waiting at most `timeout_us` for the lock.
    fn persist(&self, line: &str, timeout_us: u64) -> Result<(), LockTimeout>;
}

/// No persistent store
impl LogPersistence for () {
    fn persist(&self, _line: &str, _timeout_us: u64) -> Result<(), LockTimeout> {
        Ok(())
    }
}

impl<T: LogPersistence + ?Sized> LogPersistence for &T {
    fn persist(&self, line: &str, timeout_us: u64) -> Result<(), LockTimeout> {
        (**self).persist(line, timeout_us)
    }
}

fn append_line<B: BorrowMut<PersistentMemoryBlock>>(store: &mut PersistentLogStore<B>, line: &str) {
    let appended = store.append(line);
    debug_assert!(appended.is_ok());
}

impl<B, C> LogPersistence for SpinState<PersistentLogStore<B>, C>
where
    B: BorrowMut<PersistentMemoryBlock>,
    C: TimeSource,
{
    fn persist(&self, line: &str, timeout_us: u64) -> Result<(), LockTimeout> {
        self.try_with_mut(timeout_us, |store| append_line(store, line))
    }
}

impl<B> LogPersistence for MockState<PersistentLogStore<B>>
where
    B: BorrowMut<PersistentMemoryBlock>,
{
    fn persist(&self, line: &str, timeout_us: u64) -> Result<(), LockTimeout> {
        self.try_with_mut(timeout_us, |store| append_line(store, line))
    }
}

/// System logger
pub struct Logger<C, P, R, T, K> {
    console: C,
    store: P,
    remote: R,
    clock: T,
    core: K,
    log_level: AtomicU8,
    syslog_level: AtomicU8,
    debug_level: AtomicU8,
    lock_timeout_us: u64,
}

impl<C, P, R, T, K> Logger<C, P, R, T, K>
where
    C: ConsoleSink,
    P: LogPersistence,
    R: RemoteSink,
    T: TimeSource,
    K: CoreId,
{
    /// Logger with both thresholds at `Err` and debug traces off.
    pub const fn new(console: C, store: P, remote: R, clock: T, core: K) -> Self {
        Self {
            console,
            store,
            remote,
            clock,
            core,
            log_level: AtomicU8::new(LogPriority::Err as u8),
            syslog_level: AtomicU8::new(LogPriority::Err as u8),
            debug_level: AtomicU8::new(0),
            lock_timeout_us: DEFAULT_LOCK_TIMEOUT_US,
        }
    }

    /// Override the store lock wait (microseconds).
    pub fn with_lock_timeout(mut self, timeout_us: u64) -> Self {
        self.lock_timeout_us = timeout_us;
        self
    }

    pub fn log_level(&self) -> LogPriority {
        load_priority(&self.log_level)
    }

    pub fn set_log_level(&self, level: LogPriority) {
        self.log_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn syslog_level(&self) -> LogPriority {
        load_priority(&self.syslog_level)
    }

    pub fn set_syslog_level(&self, level: LogPriority) {
        self.syslog_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn debug_level(&self) -> u8 {
        self.debug_level.load(Ordering::Relaxed)
    }

    pub fn set_debug_level(&self, level: u8) {
        self.debug_level.store(level, Ordering::Relaxed);
    }

    /// True if a message at `priority` would go anywhere
    pub fn enabled(&self, priority: LogPriority) -> bool {
        priority.within(self.log_level()) || priority.within(self.syslog_level())
    }

    /// Log a message.
    ///
    /// A trailing newline is stripped and the message capped at 255 bytes.
    /// A store lock timeout is reported on the console and the line is not
    /// stored.
    pub fn log(&self, priority: LogPriority, args: fmt::Arguments<'_>) {
        if !self.enabled(priority) {
            return;
        }

        let start = self.clock.now_us();
        let core = self.core.core_id();
        let message = format_message(args);

        if priority.within(self.log_level()) {
            let stamp = timestamp(self.clock.now_us(), core);
            self.console.write_line(format_args!("{} {}", stamp, message));

            let line = format_line(&stamp, &message);
            if self.store.persist(&line, self.lock_timeout_us).is_err() {
                self.console.write_line(format_args!(
                    "{} mutex timeout: FAILED to access log ringbuffer",
                    stamp
                ));
            }
        }

        if priority.within(self.syslog_level()) {
            self.remote.send(priority, &message);
        }

        let end = self.clock.now_us();
        let duration = end.saturating_sub(start);
        if cfg!(debug_assertions) && duration > SLOW_LOG_US {
            self.console.write_line(format_args!(
                "log_msg: core{}: {} (duration={})",
                core, end, duration
            ));
        }
    }

    /// Debug trace, printed to the console only if `level` is within the
    /// current debug level. Not timestamped and not stored.
    pub fn debug(&self, level: u8, args: fmt::Arguments<'_>) {
        if level > self.debug_level() {
            return;
        }
        self.console.write(format_args!("[DEBUG] {}", args));
    }

    /// Store the logger writes to
    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }
}

fn load_priority(level: &AtomicU8) -> LogPriority {
    LogPriority::from_u8(level.load(Ordering::Relaxed)).unwrap_or(LogPriority::Debug)
}
