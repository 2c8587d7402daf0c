//! Board-level PWM bring-up
//!
//! A board provides a set of PWM slices (with their pins) and reports its
//! system clock. [`setup_outputs`] checks the wiring against what the board
//! actually provides before handing the slices to the duty driver.

use brickpico_core::pwm::{gpio_to_slice, DutyDriver, PinMap, PwmSlices};

use crate::platform::error::PwmError;
use crate::platform::Result;

/// PWM hardware of one board
pub trait PwmBoard: PwmSlices {
    /// System clock feeding the PWM block, in Hz
    fn sys_clock_hz(&self) -> u32;

    /// True if the board handed this slice over
    fn has_slice(&self, slice: u8) -> bool;
}

/// Bring up the first `count` outputs of `pins` at `pwm_freq`.
///
/// # Errors
///
/// `PwmError::SliceUnavailable` if an output sits on a slice the board did
/// not provide; `PwmError::Driver` for invalid wiring or an unreachable
/// frequency. All are fatal at startup.
pub fn setup_outputs<B: PwmBoard>(
    board: B,
    pins: PinMap,
    count: usize,
    pwm_freq: u32,
) -> Result<DutyDriver<B>> {
    for pin in (0..count).filter_map(|i| pins.pin(i)) {
        let slice = gpio_to_slice(pin);
        if !board.has_slice(slice) {
            return Err(PwmError::SliceUnavailable(slice).into());
        }
    }

    let sys_clock = board.sys_clock_hz();
    Ok(DutyDriver::setup(board, pins, count, sys_clock, pwm_freq)?)
}
