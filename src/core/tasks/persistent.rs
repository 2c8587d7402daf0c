//! Persistent Memory Refresh Task
//!
//! Embassy task on core 0 that keeps the uptime counter in the persistent
//! block current (so the next boot can report it) and feeds the watchdog.

use brickpico_core::traits::sync::DEFAULT_LOCK_TIMEOUT_US;
use brickpico_core::traits::{SharedState, TimeSource};
use embassy_rp::watchdog::Watchdog;
use embassy_time::{Duration, Ticker};

use crate::platform::rp2350::{EmbassyTime, FirmwareLogger, FirmwareStore};

/// Refresh interval
pub const REFRESH_INTERVAL_MS: u64 = 1000;

/// Watchdog timeout; several refresh intervals
pub const WATCHDOG_TIMEOUT_MS: u64 = 8000;

/// Persistent memory refresh task
#[embassy_executor::task]
pub async fn persistent_refresh_task(
    store: &'static FirmwareStore,
    logger: &'static FirmwareLogger,
    mut watchdog: Watchdog,
) {
    let clock = EmbassyTime;
    let mut ticker = Ticker::every(Duration::from_millis(REFRESH_INTERVAL_MS));

    watchdog.start(Duration::from_millis(WATCHDOG_TIMEOUT_MS));

    loop {
        let uptime = clock.now_us();
        if store
            .try_with_mut(DEFAULT_LOCK_TIMEOUT_US, |s| s.record_uptime(uptime))
            .is_err()
        {
            crate::log_warn!(logger, "persistent memory refresh: mutex timeout");
        }
        watchdog.feed();

        ticker.next().await;
    }
}
