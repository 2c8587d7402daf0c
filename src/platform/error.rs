//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

use brickpico_core::pwm::DriverError;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// PWM setup failed
    Pwm(PwmError),
    /// Persistent memory block already handed out
    PersistentMemoryTaken,
    /// Platform initialization failed
    InitializationFailed,
}

/// PWM-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    /// An output needs a slice the board did not provide
    SliceUnavailable(u8),
    /// Wiring or frequency rejected by the duty driver
    Driver(DriverError),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Pwm(e) => write!(f, "PWM error: {}", e),
            PlatformError::PersistentMemoryTaken => {
                write!(f, "persistent memory already in use")
            }
            PlatformError::InitializationFailed => write!(f, "Platform initialization failed"),
        }
    }
}

impl fmt::Display for PwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PwmError::SliceUnavailable(slice) => write!(f, "PWM slice {} not available", slice),
            PwmError::Driver(e) => write!(f, "{}", e),
        }
    }
}

impl From<PwmError> for PlatformError {
    fn from(e: PwmError) -> Self {
        PlatformError::Pwm(e)
    }
}

impl From<DriverError> for PlatformError {
    fn from(e: DriverError) -> Self {
        PlatformError::Pwm(PwmError::Driver(e))
    }
}
