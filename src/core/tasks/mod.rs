//! Firmware tasks
//!
//! - [`control`]: output control loop (core 1)
//! - [`persistent`]: persistent-memory refresh and watchdog feed (core 0)

pub mod control;
pub mod persistent;

pub use control::control_loop_task;
pub use persistent::persistent_refresh_task;
