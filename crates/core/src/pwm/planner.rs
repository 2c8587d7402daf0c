//! PWM frequency planner
//!
//! Counters run in phase-correct (triangle) mode, so one output period is
//! two counter sweeps:
//!
//! ```text
//! f_out = f_clk / div / (top + 1) / 2
//! ```
//!
//! The divider starts at 1 for maximum resolution and only grows when the
//! counter top would not fit the 16-bit counter.

use core::fmt;

/// Lowest accepted PWM frequency in Hz
pub const PWM_FREQ_MIN: u32 = 10;

/// Highest accepted PWM frequency in Hz
pub const PWM_FREQ_MAX: u32 = 100_000;

/// Exclusive limit for the counter top.
///
/// The compare register is 16 bits wide and full-on is programmed as
/// `top + 1`, so top itself must stay below `u16::MAX`.
pub const PWM_TOP_LIMIT: u32 = u16::MAX as u32;

/// Largest integer clock divider the slice supports
pub const PWM_DIV_MAX: u32 = 255;

/// Planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// System clock too slow to produce any counter range at this frequency
    FrequencyUnreachable {
        /// System clock in Hz
        sys_clock: u32,
        /// Clamped frequency request in Hz
        frequency: u32,
    },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::FrequencyUnreachable {
                sys_clock,
                frequency,
            } => write!(
                f,
                "PWM frequency {} Hz unreachable with system clock {} Hz",
                frequency, sys_clock
            ),
        }
    }
}

/// Divider and counter top shared by every PWM slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyPlan {
    /// Frequency after clamping to the supported range, in Hz
    pub requested_hz: u32,
    /// Integer clock divider (1..=255)
    pub clk_div: u32,
    /// Counter wrap value
    pub top: u16,
}

impl FrequencyPlan {
    /// Number of distinct duty levels below full-on (`top + 1`)
    pub fn levels(&self) -> u32 {
        self.top as u32 + 1
    }

    /// Output frequency actually produced with this plan, in Hz
    pub fn actual_frequency_hz(&self, sys_clock: u32) -> f32 {
        sys_clock as f32 / self.clk_div as f32 / self.levels() as f32 / 2.0
    }
}

/// Compute the clock divider and counter top for a requested frequency.
///
/// The request is clamped to [`PWM_FREQ_MIN`, `PWM_FREQ_MAX`]. If even the
/// largest divider cannot bring top under [`PWM_TOP_LIMIT`], divider and top
/// are clamped to their maxima (the output then runs faster than asked).
///
/// # Errors
///
/// [`PlanError::FrequencyUnreachable`] if the system clock cannot produce a
/// counter range of at least two levels.
///
/// # Example
///
/// ```
/// use brickpico_core::pwm::plan_frequency;
///
/// let plan = plan_frequency(150_000_000, 1_000).unwrap();
/// assert_eq!(plan.clk_div, 2);
/// assert_eq!(plan.top, 37_499);
/// ```
pub fn plan_frequency(sys_clock: u32, frequency: u32) -> Result<FrequencyPlan, PlanError> {
    let frequency = frequency.clamp(PWM_FREQ_MIN, PWM_FREQ_MAX);
    let unreachable = PlanError::FrequencyUnreachable {
        sys_clock,
        frequency,
    };

    let mut clk_div = 1;
    let mut top = counter_top(sys_clock, clk_div, frequency).ok_or(unreachable)?;
    if top >= PWM_TOP_LIMIT {
        clk_div = top / PWM_TOP_LIMIT + 1;
        if clk_div > PWM_DIV_MAX {
            clk_div = PWM_DIV_MAX;
        }
        top = counter_top(sys_clock, clk_div, frequency)
            .ok_or(unreachable)?
            .min(PWM_TOP_LIMIT - 1);
    }
    if top == 0 {
        return Err(unreachable);
    }

    Ok(FrequencyPlan {
        requested_hz: frequency,
        clk_div,
        top: top as u16,
    })
}

fn counter_top(sys_clock: u32, clk_div: u32, frequency: u32) -> Option<u32> {
    (sys_clock / clk_div / frequency / 2).checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOCKS: [u32; 4] = [48_000_000, 125_000_000, 150_000_000, 200_000_000];

    #[test]
    fn test_divider_one_when_top_fits() {
        let plan = plan_frequency(125_000_000, 25_000).unwrap();
        assert_eq!(plan.clk_div, 1);
        assert_eq!(plan.top, 2_499);
        assert_eq!(plan.levels(), 2_500);
    }

    #[test]
    fn test_divider_grows_for_low_frequency() {
        // 125 MHz / 10 Hz / 2 = 6.25M counts
        let plan = plan_frequency(125_000_000, 10).unwrap();
        assert_eq!(plan.clk_div, 96);
        assert_eq!(plan.top, 65_103);
    }

    #[test]
    fn test_frequency_is_clamped() {
        assert_eq!(plan_frequency(125_000_000, 1).unwrap().requested_hz, 10);
        assert_eq!(
            plan_frequency(125_000_000, 1_000_000).unwrap().requested_hz,
            100_000
        );
    }

    #[test]
    fn test_top_and_divider_bounds_over_range() {
        for sys_clock in CLOCKS {
            for frequency in [10, 11, 50, 100, 999, 1_000, 5_000, 25_000, 99_999, 100_000] {
                let plan = plan_frequency(sys_clock, frequency).unwrap();
                assert!((plan.top as u32) < 65_536);
                assert!((plan.top as u32) < PWM_TOP_LIMIT);
                assert!(plan.clk_div >= 1 && plan.clk_div <= PWM_DIV_MAX);
            }
        }
    }

    #[test]
    fn test_actual_frequency_within_quantization() {
        for sys_clock in CLOCKS {
            for frequency in [10u32, 100, 1_000, 20_000, 100_000] {
                let plan = plan_frequency(sys_clock, frequency).unwrap();
                let actual = plan.actual_frequency_hz(sys_clock);
                // One count of error at the lowest resolution (top ~ 239 at
                // 48 MHz / 100 kHz) is well under 1 %.
                let error = (actual - frequency as f32) / frequency as f32;
                assert!(error.abs() < 0.01, "{} Hz @ {} -> {}", frequency, sys_clock, actual);
            }
        }
    }

    #[test]
    fn test_top_just_below_limit_is_pushed_to_divider_two() {
        // 131_070_000 / 1000 / 2 - 1 = 65_534 fits; one more count does not
        let fits = plan_frequency(131_070_000, 1_000).unwrap();
        assert_eq!((fits.clk_div, fits.top), (1, 65_534));

        let pushed = plan_frequency(131_072_000, 1_000).unwrap();
        assert_eq!(pushed.clk_div, 2);
        assert_eq!(pushed.top, 32_767);
    }

    #[test]
    fn test_extreme_clock_is_clamped_not_rejected() {
        let plan = plan_frequency(u32::MAX, 10).unwrap();
        assert_eq!(plan.clk_div, PWM_DIV_MAX);
        assert_eq!(plan.top as u32, PWM_TOP_LIMIT - 1);
    }

    #[test]
    fn test_slow_clock_is_unreachable() {
        assert_eq!(
            plan_frequency(100_000, 100_000),
            Err(PlanError::FrequencyUnreachable {
                sys_clock: 100_000,
                frequency: 100_000
            })
        );
        assert!(plan_frequency(300_000, 100_000).is_err());
    }
}
