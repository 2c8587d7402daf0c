//! Embassy-based time source and core identification.

use brickpico_core::traits::{CoreId, TimeSource};

/// Embassy-based time source using the Embassy time driver.
///
/// This implementation uses `embassy_time::Instant` for high-resolution
/// timing; the driver counter is shared by both cores.
#[derive(Clone, Copy, Default)]
pub struct EmbassyTime;

impl TimeSource for EmbassyTime {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }

    fn now_us(&self) -> u64 {
        embassy_time::Instant::now().as_micros()
    }
}

/// Core number read from the SIO CPUID register
#[derive(Clone, Copy, Default)]
pub struct SioCoreId;

impl CoreId for SioCoreId {
    fn core_id(&self) -> u8 {
        embassy_rp::pac::SIO.cpuid().read() as u8
    }
}
