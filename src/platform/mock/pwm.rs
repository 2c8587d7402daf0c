//! Mock PWM slices for testing

use std::vec::Vec;

use brickpico_core::pwm::pins::GPIO_MAX;
use brickpico_core::pwm::{FrequencyPlan, PwmSlices};

use crate::platform::traits::PwmBoard;

/// System clock of an RP2350 at its default setting
pub const MOCK_SYS_CLOCK: u32 = 150_000_000;

/// Mock PWM slices
///
/// Records attached pins, slice configuration and compare levels for test
/// verification.
#[derive(Debug)]
pub struct MockPwmSlices {
    slice_count: u8,
    sys_clock: u32,
    attached: Vec<u8>,
    configured: Vec<(u8, FrequencyPlan)>,
    levels: [u16; GPIO_MAX as usize],
}

impl MockPwmSlices {
    /// Create mock slices: 12 slices at 150 MHz
    pub fn new() -> Self {
        Self {
            slice_count: 12,
            sys_clock: MOCK_SYS_CLOCK,
            attached: Vec::new(),
            configured: Vec::new(),
            levels: [0; GPIO_MAX as usize],
        }
    }

    /// Only provide slices `0..count`
    pub fn with_slices(mut self, count: u8) -> Self {
        self.slice_count = count;
        self
    }

    pub fn with_sys_clock(mut self, hz: u32) -> Self {
        self.sys_clock = hz;
        self
    }

    /// Pins switched to the PWM function, in attach order
    pub fn attached_pins(&self) -> &[u8] {
        &self.attached
    }

    /// Slice configurations, in configure order
    pub fn configured_slices(&self) -> &[(u8, FrequencyPlan)] {
        &self.configured
    }

    /// Last compare level written for `pin`
    pub fn level(&self, pin: u8) -> u16 {
        self.levels.get(pin as usize).copied().unwrap_or(0)
    }
}

impl Default for MockPwmSlices {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmSlices for MockPwmSlices {
    fn attach_pin(&mut self, pin: u8) {
        self.attached.push(pin);
    }

    fn configure_slice(&mut self, slice: u8, plan: &FrequencyPlan) {
        self.configured.push((slice, *plan));
    }

    fn set_level(&mut self, pin: u8, level: u16) {
        if let Some(slot) = self.levels.get_mut(pin as usize) {
            *slot = level;
        }
    }
}

impl PwmBoard for MockPwmSlices {
    fn sys_clock_hz(&self) -> u32 {
        self.sys_clock
    }

    fn has_slice(&self, slice: u8) -> bool {
        slice < self.slice_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::error::{PlatformError, PwmError};
    use crate::platform::setup_outputs;
    use brickpico_core::pwm::PinMap;

    #[test]
    fn test_setup_configures_pairs() {
        let driver = setup_outputs(MockPwmSlices::new(), PinMap::BRICKPICO, 6, 1000).unwrap();

        let hw = driver.hardware();
        assert_eq!(hw.attached_pins(), &[0, 1, 2, 3, 4, 5]);
        let slices: Vec<u8> = hw.configured_slices().iter().map(|(s, _)| *s).collect();
        assert_eq!(slices, [0, 1, 2]);
        assert_eq!(hw.configured_slices()[0].1, *driver.plan());
    }

    #[test]
    fn test_missing_slice_is_fatal() {
        let err = setup_outputs(
            MockPwmSlices::new().with_slices(2),
            PinMap::BRICKPICO,
            8,
            1000,
        )
        .err();

        assert_eq!(err, Some(PlatformError::Pwm(PwmError::SliceUnavailable(2))));
    }

    #[test]
    fn test_slow_clock_is_fatal() {
        let err = setup_outputs(
            MockPwmSlices::new().with_sys_clock(1_000),
            PinMap::BRICKPICO,
            2,
            100_000,
        )
        .err();

        assert!(matches!(err, Some(PlatformError::Pwm(PwmError::Driver(_)))));
    }

    #[test]
    fn test_levels_follow_duty() {
        let mut driver = setup_outputs(MockPwmSlices::new(), PinMap::BRICKPICO, 2, 1000).unwrap();
        let top = driver.plan().top;

        driver.set_duty(0, 100.0).unwrap();
        driver.set_duty(1, 50.0).unwrap();

        assert_eq!(driver.hardware().level(0), top + 1);
        assert_eq!(driver.hardware().level(1), ((top as u32 + 1) / 2) as u16);
    }
}
