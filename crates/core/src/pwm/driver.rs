//! Duty-cycle driver
//!
//! Quantizes a duty percentage into a compare level for the configured
//! counter top and writes it to the slice channel wired to the output.
//!
//! | duty        | level                           |
//! |-------------|---------------------------------|
//! | `>= 100.0`  | `top + 1` (always high)         |
//! | `(0, 100)`  | `trunc(duty * (top + 1) / 100)` |
//! | `<= 0.0`    | `0`                             |
//!
//! Full-on is one past top so the pin never drops low at 100 %.

use core::fmt;

use super::pins::{gpio_to_slice, PinMap, PinMapError};
use super::planner::{plan_frequency, FrequencyPlan, PlanError};

/// PWM slice hardware
///
/// Implemented by the RP2350 register driver and by `MockPwmSlices` in
/// host tests.
pub trait PwmSlices {
    /// Route a GPIO to its PWM slice function.
    fn attach_pin(&mut self, pin: u8);

    /// Program divider and top, select phase-correct counting and enable.
    fn configure_slice(&mut self, slice: u8, plan: &FrequencyPlan);

    /// Write the compare level of the channel driving `pin`.
    fn set_level(&mut self, pin: u8, level: u16);
}

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// Board wiring invalid (fatal at startup)
    PinMap(PinMapError),
    /// Frequency plan impossible (fatal at startup)
    Plan(PlanError),
    /// Output index not configured
    OutputOutOfRange(usize),
}

impl From<PinMapError> for DriverError {
    fn from(e: PinMapError) -> Self {
        DriverError::PinMap(e)
    }
}

impl From<PlanError> for DriverError {
    fn from(e: PlanError) -> Self {
        DriverError::Plan(e)
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::PinMap(e) => write!(f, "PWM wiring error: {}", e),
            DriverError::Plan(e) => write!(f, "PWM setup error: {}", e),
            DriverError::OutputOutOfRange(output) => {
                write!(f, "output index {} out of range", output)
            }
        }
    }
}

/// Compare level for a duty percentage at the given counter top.
pub fn duty_to_level(duty: f32, top: u16) -> u16 {
    let full = top as u32 + 1;
    if duty >= 100.0 {
        full as u16
    } else if duty > 0.0 {
        (duty * full as f32 / 100.0) as u16
    } else {
        0
    }
}

/// Duty driver for the configured outputs
pub struct DutyDriver<P> {
    hw: P,
    pins: PinMap,
    plan: FrequencyPlan,
    count: usize,
}

impl<P: PwmSlices> DutyDriver<P> {
    /// Plan the frequency, check the wiring and bring up every slice.
    ///
    /// Runs once at startup, before the second core starts.
    ///
    /// # Errors
    ///
    /// [`DriverError::PinMap`] or [`DriverError::Plan`]; both mean the board
    /// must not drive its outputs.
    pub fn setup(
        mut hw: P,
        pins: PinMap,
        count: usize,
        sys_clock: u32,
        pwm_freq: u32,
    ) -> Result<Self, DriverError> {
        pins.validate(count)?;
        let plan = plan_frequency(sys_clock, pwm_freq)?;

        for output in (0..count).step_by(2) {
            let mut slice = None;
            for pin in (output..count.min(output + 2)).filter_map(|i| pins.pin(i)) {
                hw.attach_pin(pin);
                slice = Some(gpio_to_slice(pin));
            }
            if let Some(slice) = slice {
                hw.configure_slice(slice, &plan);
            }
        }

        Ok(Self {
            hw,
            pins,
            plan,
            count,
        })
    }

    /// Set the duty cycle (percent) of one output; returns the level written.
    pub fn set_duty(&mut self, output: usize, duty: f32) -> Result<u16, DriverError> {
        let pin = self
            .pins
            .pin(output)
            .filter(|_| output < self.count)
            .ok_or(DriverError::OutputOutOfRange(output))?;
        let level = duty_to_level(duty, self.plan.top);
        self.hw.set_level(pin, level);
        Ok(level)
    }

    /// Frequency plan applied to all slices
    pub fn plan(&self) -> &FrequencyPlan {
        &self.plan
    }

    /// Number of driven outputs
    pub fn output_count(&self) -> usize {
        self.count
    }

    /// Underlying hardware
    pub fn hardware(&self) -> &P {
        &self.hw
    }
}
