//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.
//! The output-level traits (`PwmSlices`, `TimeSource`, `CoreId`,
//! `ConsoleSink`, `RemoteSink`) come from `brickpico_core`.

pub mod board;

pub use board::{setup_outputs, PwmBoard};
