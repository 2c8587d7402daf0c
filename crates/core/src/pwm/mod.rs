//! PWM output planning and duty-cycle driving.
//!
//! - [`planner`]: picks the clock divider and counter top for the requested
//!   frequency (run once at startup)
//! - [`pins`]: board wiring of logical outputs to GPIO pins and PWM slices
//! - [`driver`]: programs quantized duty levels through a [`PwmSlices`]
//!   hardware implementation

pub mod driver;
pub mod pins;
pub mod planner;

pub use driver::{duty_to_level, DriverError, DutyDriver, PwmSlices};
pub use pins::{gpio_to_slice, PinMap, PinMapError, PwmChannel};
pub use planner::{plan_frequency, FrequencyPlan, PlanError};
