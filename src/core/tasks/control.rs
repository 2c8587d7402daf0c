//! Control Loop Task
//!
//! Embassy task that evaluates every output at a fixed tick: effects,
//! duty quantization and the PWM compare writes all happen here.
//!
//! ## Responsibilities
//!
//! - Call `OutputController::tick` every 10 ms
//! - Report (rate-limited) when the shared output state stays locked
//!
//! This task runs on core 1 and is the only caller of `tick`, which the
//! fade effect needs to see power changes as edges.

use embassy_time::{Duration, Ticker};

use crate::platform::rp2350::{FirmwareController, FirmwareLogger};

/// Control tick interval
pub const CONTROL_TICK_MS: u64 = 10;

/// Consecutive lock timeouts between two warnings
const TIMEOUT_REPORT_INTERVAL: u32 = 100;

/// Control loop task
#[embassy_executor::task]
pub async fn control_loop_task(mut controller: FirmwareController, logger: &'static FirmwareLogger) {
    crate::log_info!(logger, "Control loop started ({} ms tick)", CONTROL_TICK_MS);

    let mut ticker = Ticker::every(Duration::from_millis(CONTROL_TICK_MS));
    let mut timeouts: u32 = 0;

    loop {
        match controller.tick() {
            Ok(()) => timeouts = 0,
            Err(e) => {
                if timeouts % TIMEOUT_REPORT_INTERVAL == 0 {
                    crate::log_warn!(logger, "control loop: output state {}", e);
                }
                timeouts = timeouts.wrapping_add(1);
            }
        }

        ticker.next().await;
    }
}
