//! Firmware infrastructure
//!
//! Logging macros and remote log channel, plus the embassy tasks that run
//! the outputs and the persistent-memory refresh.

pub mod logging;

#[cfg(feature = "pico2_w")]
pub mod tasks;
