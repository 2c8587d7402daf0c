//! Output to GPIO/PWM-slice wiring
//!
//! Each PWM slice drives two pins (channel A on the even GPIO, channel B on
//! the odd one) and all slices share the same divider/top. The board map
//! must place logical outputs `2k` and `2k + 1` on the two channels of one
//! slice; setup refuses to run with any other wiring.

use core::fmt;

use crate::output::OUTPUT_MAX_COUNT;

/// Number of GPIOs routable to PWM slices (RP2350B)
pub const GPIO_MAX: u8 = 48;

/// PWM channel within a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmChannel {
    A,
    B,
}

/// Wiring errors, fatal at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMapError {
    /// More outputs requested than the map holds
    TooManyOutputs(usize),
    /// GPIO number outside the PWM-capable range
    InvalidPin { output: usize, pin: u8 },
    /// Outputs `2k` and `2k + 1` are not the A/B pair of one slice
    SliceMismatch { output: usize, pin_a: u8, pin_b: u8 },
}

impl fmt::Display for PinMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinMapError::TooManyOutputs(count) => {
                write!(f, "{} outputs exceed pin map ({} max)", count, OUTPUT_MAX_COUNT)
            }
            PinMapError::InvalidPin { output, pin } => {
                write!(f, "output {}: GPIO{} is not PWM capable", output + 1, pin)
            }
            PinMapError::SliceMismatch {
                output,
                pin_a,
                pin_b,
            } => write!(
                f,
                "outputs {} and {}: GPIO{} and GPIO{} are not on the same PWM slice",
                output + 1,
                output + 2,
                pin_a,
                pin_b
            ),
        }
    }
}

/// PWM slice number for a GPIO (RP2350 numbering)
///
/// GPIO0..31 map onto slices 0..7 twice over, GPIO32..47 onto slices 8..11.
pub const fn gpio_to_slice(pin: u8) -> u8 {
    if pin < 32 {
        (pin >> 1) & 7
    } else {
        8 + ((pin >> 1) & 3)
    }
}

/// Channel of a GPIO within its slice
pub const fn gpio_to_channel(pin: u8) -> PwmChannel {
    if pin & 1 == 0 {
        PwmChannel::A
    } else {
        PwmChannel::B
    }
}

/// Board wiring of logical outputs to GPIO pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    pins: [u8; OUTPUT_MAX_COUNT],
}

impl PinMap {
    /// BrickPico boards wire outputs 1..16 to GPIO0..15 in order.
    pub const BRICKPICO: PinMap = PinMap::consecutive(0);

    /// Wrap an explicit wiring table
    pub const fn new(pins: [u8; OUTPUT_MAX_COUNT]) -> Self {
        Self { pins }
    }

    /// Outputs wired to consecutive GPIOs starting at `first`
    pub const fn consecutive(first: u8) -> Self {
        let mut pins = [0u8; OUTPUT_MAX_COUNT];
        let mut i = 0;
        while i < OUTPUT_MAX_COUNT {
            pins[i] = first + i as u8;
            i += 1;
        }
        Self { pins }
    }

    /// GPIO driving `output`
    pub fn pin(&self, output: usize) -> Option<u8> {
        self.pins.get(output).copied()
    }

    /// Check that the first `count` outputs form valid slice pairs.
    ///
    /// An odd trailing output is accepted on its own.
    pub fn validate(&self, count: usize) -> Result<(), PinMapError> {
        if count > OUTPUT_MAX_COUNT {
            return Err(PinMapError::TooManyOutputs(count));
        }

        for (output, &pin) in self.pins[..count].iter().enumerate() {
            if pin >= GPIO_MAX {
                return Err(PinMapError::InvalidPin { output, pin });
            }
        }

        for pair in (0..count).step_by(2) {
            if pair + 1 >= count {
                break;
            }
            let (pin_a, pin_b) = (self.pins[pair], self.pins[pair + 1]);
            if gpio_to_slice(pin_a) != gpio_to_slice(pin_b)
                || gpio_to_channel(pin_a) == gpio_to_channel(pin_b)
            {
                return Err(PinMapError::SliceMismatch {
                    output: pair,
                    pin_a,
                    pin_b,
                });
            }
        }

        Ok(())
    }
}
