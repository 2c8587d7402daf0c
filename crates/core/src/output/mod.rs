//! Outputs: static configuration and live runtime state
//!
//! [`OutputConfig`] comes from configuration and does not change while the
//! outputs run. [`BrickpicoState`] is the live state shared between the
//! control loop and the collaborators (commands, timers, network, display)
//! behind a [`SharedState`](crate::traits::SharedState) lock.

pub mod controller;

use heapless::String;

use crate::effects::{EffectArgs, EffectError, EffectInstance, EffectKind};

pub use controller::OutputController;

/// Maximum number of PWM outputs on a board
pub const OUTPUT_MAX_COUNT: usize = 16;

/// Maximum output name length
pub const MAX_NAME_LEN: usize = 64;

/// How an output is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelType {
    /// Continuously variable duty cycle
    #[default]
    Dimmer,
    /// Binary on/off, always full duty when on
    Toggle,
}

/// Effect selected for an output, by kind and argument string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectBinding {
    pub kind: EffectKind,
    pub args: EffectArgs,
}

impl EffectBinding {
    /// Binding for a parsed instance, with canonical arguments
    pub fn of(instance: &EffectInstance) -> Self {
        Self {
            kind: instance.kind(),
            args: instance.format(),
        }
    }
}

/// Configuration of one output
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub name: String<MAX_NAME_LEN>,
    /// Lowest duty applied while on (0-100)
    pub min_duty: u8,
    /// Highest duty applied while on (0-100)
    pub max_duty: u8,
    /// Duty at boot (0-100)
    pub default_duty: u8,
    /// Power at boot
    pub default_power: bool,
    pub channel: ChannelType,
    pub effect: Option<EffectBinding>,
}

impl OutputConfig {
    /// Default configuration for output number `index` (0-based)
    pub fn new(index: usize) -> Self {
        let mut name = String::new();
        let _ = core::fmt::write(&mut name, format_args!("Output {}", index + 1));
        Self {
            name,
            min_duty: 0,
            max_duty: 100,
            default_duty: 100,
            default_power: false,
            channel: ChannelType::Dimmer,
            effect: None,
        }
    }

    /// Duty to drive while on, for a commanded duty
    pub fn target_duty(&self, duty: u8) -> u8 {
        match self.channel {
            ChannelType::Toggle => 100,
            ChannelType::Dimmer => {
                let max = self.max_duty.min(100);
                duty.clamp(self.min_duty.min(max), max)
            }
        }
    }
}

/// Live values of one output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputState {
    /// Commanded power
    pub power: bool,
    /// Commanded duty (0-100)
    pub duty: u8,
    /// Duty last written to the hardware (0-100)
    pub applied: u8,
}

/// Pending effect change for the control loop
#[derive(Debug, Clone, PartialEq)]
pub enum EffectRequest {
    Attach(EffectInstance),
    Detach,
}

const NO_BINDING: Option<EffectBinding> = None;
const NO_REQUEST: Option<EffectRequest> = None;

/// Live state of all outputs plus the board temperature
#[derive(Debug, Clone, PartialEq)]
pub struct BrickpicoState {
    outputs: [OutputState; OUTPUT_MAX_COUNT],
    effects: [Option<EffectBinding>; OUTPUT_MAX_COUNT],
    requests: [Option<EffectRequest>; OUTPUT_MAX_COUNT],
    count: usize,
    /// Last measured temperature in degrees Celsius
    pub temp: f32,
}

impl BrickpicoState {
    /// State for `configs` reset to their defaults
    pub fn new(configs: &[OutputConfig]) -> Self {
        let mut state = Self {
            outputs: [OutputState::default(); OUTPUT_MAX_COUNT],
            effects: [NO_BINDING; OUTPUT_MAX_COUNT],
            requests: [NO_REQUEST; OUTPUT_MAX_COUNT],
            count: configs.len().min(OUTPUT_MAX_COUNT),
            temp: 0.0,
        };
        for (i, config) in configs.iter().take(OUTPUT_MAX_COUNT).enumerate() {
            state.outputs[i] = OutputState {
                power: config.default_power,
                duty: config.default_duty.min(100),
                applied: 0,
            };
            state.effects[i] = config.effect.clone();
        }
        state
    }

    /// Number of configured outputs
    pub fn output_count(&self) -> usize {
        self.count
    }

    /// Live values of an output
    pub fn output(&self, output: usize) -> Option<&OutputState> {
        self.outputs[..self.count].get(output)
    }

    /// Live values of all configured outputs
    pub fn outputs(&self) -> &[OutputState] {
        &self.outputs[..self.count]
    }

    /// Command power on or off
    pub fn set_power(&mut self, output: usize, power: bool) -> Result<(), EffectError> {
        self.output_mut(output)?.power = power;
        Ok(())
    }

    /// Command a duty; values above 100 are clamped
    pub fn set_duty(&mut self, output: usize, duty: u8) -> Result<(), EffectError> {
        self.output_mut(output)?.duty = duty.min(100);
        Ok(())
    }

    /// Queue an effect for the control loop; arguments are parsed here.
    pub fn request_effect(
        &mut self,
        output: usize,
        kind: EffectKind,
        args: &str,
    ) -> Result<(), EffectError> {
        self.output_mut(output)?;
        let instance = EffectInstance::new(kind, args).ok_or(EffectError::InvalidArguments)?;
        self.effects[output] = Some(EffectBinding::of(&instance));
        self.requests[output] = Some(EffectRequest::Attach(instance));
        Ok(())
    }

    /// Queue removal of an output's effect
    pub fn request_detach(&mut self, output: usize) -> Result<(), EffectError> {
        self.output_mut(output)?;
        self.effects[output] = None;
        self.requests[output] = Some(EffectRequest::Detach);
        Ok(())
    }

    /// Effect selected for an output
    pub fn effect(&self, output: usize) -> Option<&EffectBinding> {
        self.effects[..self.count].get(output)?.as_ref()
    }

    pub(crate) fn snapshot(&self) -> [OutputState; OUTPUT_MAX_COUNT] {
        self.outputs
    }

    pub(crate) fn take_requests(&mut self) -> [Option<EffectRequest>; OUTPUT_MAX_COUNT] {
        core::mem::replace(&mut self.requests, [NO_REQUEST; OUTPUT_MAX_COUNT])
    }

    pub(crate) fn record_applied(&mut self, applied: &[u8]) {
        for (state, &duty) in self.outputs.iter_mut().zip(applied) {
            state.applied = duty;
        }
    }

    fn output_mut(&mut self, output: usize) -> Result<&mut OutputState, EffectError> {
        self.outputs[..self.count]
            .get_mut(output)
            .ok_or(EffectError::OutputOutOfRange(output))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    fn configs(count: usize) -> Vec<OutputConfig> {
        (0..count).map(OutputConfig::new).collect()
    }

    #[test]
    fn test_default_output_config() {
        let config = OutputConfig::new(4);
        assert_eq!(config.name.as_str(), "Output 5");
        assert_eq!((config.min_duty, config.max_duty, config.default_duty), (0, 100, 100));
        assert!(!config.default_power);
        assert_eq!(config.channel, ChannelType::Dimmer);
    }

    #[test]
    fn test_target_duty_limits() {
        let mut config = OutputConfig::new(0);
        config.min_duty = 20;
        config.max_duty = 80;
        assert_eq!(config.target_duty(10), 20);
        assert_eq!(config.target_duty(50), 50);
        assert_eq!(config.target_duty(95), 80);

        config.channel = ChannelType::Toggle;
        assert_eq!(config.target_duty(10), 100);

        // Inverted limits collapse to max
        config.channel = ChannelType::Dimmer;
        config.min_duty = 90;
        assert_eq!(config.target_duty(50), 80);
    }

    #[test]
    fn test_state_starts_from_defaults() {
        let mut cfgs = configs(4);
        cfgs[1].default_power = true;
        cfgs[1].default_duty = 40;
        cfgs[2].effect = Some(EffectBinding {
            kind: EffectKind::Fade,
            args: EffectArgs::try_from("1.000000,1.000000").unwrap(),
        });

        let state = BrickpicoState::new(&cfgs);

        assert_eq!(state.output_count(), 4);
        assert_eq!(
            state.output(1),
            Some(&OutputState { power: true, duty: 40, applied: 0 })
        );
        assert_eq!(state.effect(2).map(|b| b.kind), Some(EffectKind::Fade));
        assert!(state.output(4).is_none());
    }

    #[test]
    fn test_commands_are_range_checked() {
        let mut state = BrickpicoState::new(&configs(2));

        state.set_power(1, true).unwrap();
        state.set_duty(1, 250).unwrap();
        assert_eq!(state.output(1).unwrap().duty, 100);
        assert!(state.output(1).unwrap().power);

        assert_eq!(state.set_power(2, true), Err(EffectError::OutputOutOfRange(2)));
        assert_eq!(state.set_duty(16, 1), Err(EffectError::OutputOutOfRange(16)));
    }

    #[test]
    fn test_effect_requests_are_queued_once() {
        let mut state = BrickpicoState::new(&configs(2));

        state.request_effect(0, EffectKind::Fade, "0.5").unwrap();
        assert_eq!(state.effect(0).unwrap().args.as_str(), "0.500000,1.000000");

        let requests = state.take_requests();
        assert!(matches!(requests[0], Some(EffectRequest::Attach(_))));
        assert!(requests[1].is_none());
        assert!(state.take_requests().iter().all(Option::is_none));

        state.request_detach(0).unwrap();
        assert!(state.effect(0).is_none());
        assert_eq!(state.take_requests()[0], Some(EffectRequest::Detach));

        assert_eq!(
            state.request_effect(5, EffectKind::Fade, ""),
            Err(EffectError::OutputOutOfRange(5))
        );
    }
}
