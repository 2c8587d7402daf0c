//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use brickpico::platform::mock::MockPwmSlices;
//! use brickpico::platform::setup_outputs;
//! use brickpico_core::pwm::PinMap;
//!
//! let mut driver = setup_outputs(MockPwmSlices::new(), PinMap::BRICKPICO, 4, 1000).unwrap();
//! driver.set_duty(1, 50.0).unwrap();
//! assert!(driver.hardware().level(1) > 0);
//! ```

#![cfg(any(test, feature = "mock"))]

mod console;
mod pwm;

pub use console::{MockConsole, MockRemote};
pub use pwm::MockPwmSlices;
