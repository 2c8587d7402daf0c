//! Board configuration
//!
//! Loading and saving configuration belongs to the configuration
//! collaborator; this is the in-memory form the core runs from. Values out
//! of range are clamped when the configuration is normalized, never
//! rejected.

use heapless::Vec;

use crate::effects::{EffectError, EffectInstance, EffectKind};
use crate::log::LogPriority;
use crate::output::{EffectBinding, OutputConfig, OUTPUT_MAX_COUNT};
use crate::pwm::planner::{PWM_FREQ_MAX, PWM_FREQ_MIN};

/// Default PWM frequency (Hz)
pub const DEFAULT_PWM_FREQ: u32 = 1000;

/// Default number of active outputs
pub const DEFAULT_OUTPUT_COUNT: usize = 8;

/// Complete board configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BrickpicoConfig {
    pub outputs: Vec<OutputConfig, OUTPUT_MAX_COUNT>,
    /// PWM frequency shared by all outputs (Hz)
    pub pwm_freq: u32,
    /// Console and persistent log threshold
    pub log_level: LogPriority,
    /// Remote log threshold
    pub syslog_level: LogPriority,
    /// `debug()` trace depth, 0 disables
    pub debug_level: u8,
}

impl BrickpicoConfig {
    /// Defaults for `count` outputs (capped at the board maximum)
    pub fn with_outputs(count: usize) -> Self {
        let outputs = (0..count.min(OUTPUT_MAX_COUNT))
            .map(OutputConfig::new)
            .collect();
        Self {
            outputs,
            pwm_freq: DEFAULT_PWM_FREQ,
            log_level: LogPriority::Err,
            syslog_level: LogPriority::Err,
            debug_level: 0,
        }
    }

    /// Bind an effect by name to an output, parsing its arguments.
    pub fn bind_effect(&mut self, output: usize, name: &str, args: &str) -> Result<(), EffectError> {
        let kind = EffectKind::from_name(name).ok_or(EffectError::UnknownEffect)?;
        let config = self
            .outputs
            .get_mut(output)
            .ok_or(EffectError::OutputOutOfRange(output))?;
        let instance = EffectInstance::new(kind, args).ok_or(EffectError::InvalidArguments)?;
        config.effect = Some(EffectBinding::of(&instance));
        Ok(())
    }

    /// Clamp every value into its valid range.
    pub fn normalize(&mut self) {
        self.pwm_freq = self.pwm_freq.clamp(PWM_FREQ_MIN, PWM_FREQ_MAX);
        for output in self.outputs.iter_mut() {
            output.max_duty = output.max_duty.min(100);
            output.min_duty = output.min_duty.min(output.max_duty);
            output.default_duty = output.default_duty.min(100);
        }
    }
}

impl Default for BrickpicoConfig {
    fn default() -> Self {
        Self::with_outputs(DEFAULT_OUTPUT_COUNT)
    }
}
