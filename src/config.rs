//! Build-time board configuration
//!
//! Defaults can be provided at build time via environment variables (read
//! by `build.rs`):
//! - `BRICKPICO_OUTPUTS` - number of active outputs (1-16, default 8)
//! - `BRICKPICO_PWM_FREQ` - PWM frequency in Hz (default 1000)

use brickpico_core::config::{BrickpicoConfig, DEFAULT_OUTPUT_COUNT, DEFAULT_PWM_FREQ};

/// Active output count from the build environment
pub fn build_output_count() -> usize {
    env!("BRICKPICO_OUTPUTS")
        .parse()
        .unwrap_or(DEFAULT_OUTPUT_COUNT)
}

/// PWM frequency from the build environment
pub fn build_pwm_freq() -> u32 {
    env!("BRICKPICO_PWM_FREQ")
        .parse()
        .unwrap_or(DEFAULT_PWM_FREQ)
}

/// Board configuration with build-time defaults applied and normalized
pub fn default_config() -> BrickpicoConfig {
    let mut config = BrickpicoConfig::with_outputs(build_output_count());
    config.pwm_freq = build_pwm_freq();
    config.normalize();
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_normalized() {
        let config = default_config();
        assert!(!config.outputs.is_empty());
        assert!(config.outputs.len() <= 16);
        assert!((10..=100_000).contains(&config.pwm_freq));
    }
}
