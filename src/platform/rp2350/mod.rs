//! RP2350 platform implementation for Raspberry Pi Pico 2 W
//!
//! This module provides concrete implementations of the platform traits for
//! the RP2350 microcontroller using the `embassy-rp` crate.
//!
//! # Feature Gate
//!
//! This module is only available when the `pico2_w` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! brickpico = { version = "0.1", features = ["pico2_w"] }
//! ```

mod console;
mod persistent;
mod pwm;
mod time;

pub use console::DefmtConsole;
pub use persistent::take_persistent_block;
pub use pwm::{Rp2350PwmSlices, SLICE_COUNT};
pub use time::{EmbassyTime, SioCoreId};

use brickpico_core::log::{Logger, PersistentLogStore, PersistentMemoryBlock};
use brickpico_core::output::{BrickpicoState, OutputController};
use brickpico_core::traits::SpinState;

use crate::core::logging::ChannelRemoteSink;

/// Output runtime state shared by both cores
pub type FirmwareState = SpinState<BrickpicoState, EmbassyTime>;

/// Persistent log store shared by both cores
pub type FirmwareStore = SpinState<PersistentLogStore<&'static mut PersistentMemoryBlock>, EmbassyTime>;

/// The system logger
pub type FirmwareLogger =
    Logger<DefmtConsole, &'static FirmwareStore, ChannelRemoteSink, EmbassyTime, SioCoreId>;

/// Control loop driving the PWM outputs
pub type FirmwareController = OutputController<Rp2350PwmSlices, &'static FirmwareState, EmbassyTime>;
