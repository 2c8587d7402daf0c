#![cfg_attr(not(test), no_std)]

//! brickpico - PWM output controller firmware for Raspberry Pi Pico 2 W
//!
//! This library wires the platform-independent logic in `brickpico_core`
//! (frequency planner, duty driver, effects, persistent log store, logger)
//! to the RP2350 hardware and provides mock hardware for host tests.

#[cfg(all(not(test), feature = "mock"))]
extern crate std;

// Platform abstraction layer (PWM slices, console, clock, persistent RAM)
pub mod platform;

// Logging macros and firmware tasks
pub mod core;

// Build-time board configuration
pub mod config;
