//! brickpico_core - Pure no_std logic for the BrickPico output controller
//!
//! This crate contains the platform-agnostic algorithms and types that can
//! be tested on host without any feature flags or embassy dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Platform services injected via traits
//!
//! # Modules
//!
//! - [`traits`]: Time source, core id and lock-guarded shared state
//! - [`pwm`]: Frequency planner, pin map and duty driver
//! - [`effects`]: Effect trait, fade effect and per-output engine
//! - [`output`]: Output configuration, live state and control loop
//! - [`log`]: Persistent ring buffer store and logger facade
//! - [`config`]: Board configuration with defaults

#![no_std]

pub mod config;
pub mod effects;
pub mod log;
pub mod output;
pub mod pwm;
pub mod traits;
