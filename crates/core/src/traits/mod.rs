//! Platform-agnostic trait abstractions for the output-control core.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Platform implementations (Embassy time driver, RP2350 core id) live in
//!   the firmware crate

pub mod sync;
pub mod time;

pub use sync::{LockTimeout, MockState, SharedState, SpinState};
pub use time::{MockTime, TimeSource};

/// Identifies the execution core a call is running on.
///
/// The logger stamps every line with this value. Single-core hosts return 0.
pub trait CoreId {
    /// Returns the number of the calling core.
    fn core_id(&self) -> u8;
}

/// Fixed core id, for host tests and single-core builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedCore(pub u8);

impl CoreId for FixedCore {
    fn core_id(&self) -> u8 {
        self.0
    }
}
