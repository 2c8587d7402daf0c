//! RP2350 PWM implementation
//!
//! This module drives the PWM slices through `embassy-rp`. Each slice is
//! created by the board code with both of its pins (`Pwm::new_output_ab`),
//! which also selects the PWM pin function, and handed over here.

use brickpico_core::pwm::pins::gpio_to_channel;
use brickpico_core::pwm::{gpio_to_slice, FrequencyPlan, PwmChannel, PwmSlices};
use embassy_rp::pwm::{Config, Pwm};

use crate::platform::traits::PwmBoard;

/// PWM slices on the RP2350B (the RP2350A has the first 8)
pub const SLICE_COUNT: usize = 12;

struct Slice {
    pwm: Pwm<'static>,
    config: Config,
}

const NO_SLICE: Option<Slice> = None;

/// RP2350 PWM slices
pub struct Rp2350PwmSlices {
    slices: [Option<Slice>; SLICE_COUNT],
}

impl Rp2350PwmSlices {
    pub fn new() -> Self {
        Self {
            slices: [NO_SLICE; SLICE_COUNT],
        }
    }

    /// Hand over slice number `slice`, already bound to its pins.
    pub fn insert(&mut self, slice: u8, pwm: Pwm<'static>) {
        if let Some(slot) = self.slices.get_mut(slice as usize) {
            *slot = Some(Slice {
                pwm,
                config: Config::default(),
            });
        }
    }
}

impl Default for Rp2350PwmSlices {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmSlices for Rp2350PwmSlices {
    fn attach_pin(&mut self, _pin: u8) {
        // Pin function was selected when the slice was created
    }

    fn configure_slice(&mut self, slice: u8, plan: &FrequencyPlan) {
        let Some(Some(s)) = self.slices.get_mut(slice as usize) else {
            return;
        };
        s.config.top = plan.top;
        s.config.divider = u8::try_from(plan.clk_div).unwrap_or(u8::MAX).into();
        s.config.phase_correct = true;
        s.config.compare_a = 0;
        s.config.compare_b = 0;
        s.config.enable = true;
        s.pwm.set_config(&s.config);
    }

    fn set_level(&mut self, pin: u8, level: u16) {
        let Some(Some(s)) = self.slices.get_mut(gpio_to_slice(pin) as usize) else {
            return;
        };
        let compare = match gpio_to_channel(pin) {
            PwmChannel::A => &mut s.config.compare_a,
            PwmChannel::B => &mut s.config.compare_b,
        };
        if *compare != level {
            *compare = level;
            s.pwm.set_config(&s.config);
        }
    }
}

impl PwmBoard for Rp2350PwmSlices {
    fn sys_clock_hz(&self) -> u32 {
        embassy_rp::clocks::clk_sys_freq()
    }

    fn has_slice(&self, slice: u8) -> bool {
        matches!(self.slices.get(slice as usize), Some(Some(_)))
    }
}
