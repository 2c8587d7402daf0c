//! Output control loop
//!
//! Once per tick, for every configured output:
//!
//! 1. snapshot commanded power/duty and pending effect changes (one lock)
//! 2. run the output's effect (or plain on/off) to get the duty to apply
//! 3. program the duty through the [`DutyDriver`]
//! 4. publish the applied duties (one lock)
//!
//! `tick` must only be called from one place, at a steady rate; effects see
//! power changes as edges between consecutive ticks.

use heapless::Vec;

use crate::effects::{EffectEngine, EffectInstance};
use crate::output::{BrickpicoState, ChannelType, EffectRequest, OutputConfig, OUTPUT_MAX_COUNT};
use crate::pwm::{DutyDriver, PwmSlices};
use crate::traits::sync::DEFAULT_LOCK_TIMEOUT_US;
use crate::traits::{LockTimeout, SharedState, TimeSource};

/// Drives the outputs from the shared state
pub struct OutputController<P, S, T> {
    driver: DutyDriver<P>,
    effects: EffectEngine,
    outputs: Vec<OutputConfig, OUTPUT_MAX_COUNT>,
    state: S,
    clock: T,
}

impl<P, S, T> OutputController<P, S, T>
where
    P: PwmSlices,
    S: SharedState<BrickpicoState>,
    T: TimeSource,
{
    /// Controller for the outputs the driver was set up with.
    ///
    /// Effects bound in the configuration are attached; a binding whose
    /// arguments do not parse leaves the output without effect.
    pub fn new(driver: DutyDriver<P>, configs: &[OutputConfig], state: S, clock: T) -> Self {
        let mut effects = EffectEngine::new();
        let mut outputs = Vec::new();
        for (i, config) in configs.iter().take(driver.output_count()).enumerate() {
            if let Some(binding) = &config.effect {
                let _ = effects.attach(i, binding.kind, &binding.args);
            }
            let _ = outputs.push(config.clone());
        }

        Self {
            driver,
            effects,
            outputs,
            state,
            clock,
        }
    }

    /// Evaluate and apply every output once.
    ///
    /// # Errors
    ///
    /// [`LockTimeout`] if the shared state was busy; the tick is skipped (or
    /// its applied duties go unreported) and the next tick catches up.
    pub fn tick(&mut self) -> Result<(), LockTimeout> {
        let (commanded, requests) = self.state.try_with_mut(DEFAULT_LOCK_TIMEOUT_US, |s| {
            (s.snapshot(), s.take_requests())
        })?;

        for (i, request) in requests.into_iter().enumerate() {
            match request {
                Some(EffectRequest::Attach(instance)) => self.install(i, instance),
                Some(EffectRequest::Detach) => {
                    self.effects.detach(i);
                }
                None => {}
            }
        }

        let now_us = self.clock.now_us();
        let mut applied = [0u8; OUTPUT_MAX_COUNT];
        for (i, config) in self.outputs.iter().enumerate() {
            let command = commanded[i];
            let target = config.target_duty(command.duty);
            let duty = match config.channel {
                ChannelType::Toggle if command.power => target,
                ChannelType::Toggle => 0,
                ChannelType::Dimmer => self.effects.apply(i, now_us, target, command.power),
            };
            if self.driver.set_duty(i, duty as f32).is_ok() {
                applied[i] = duty;
            }
        }

        let count = self.outputs.len();
        self.state
            .try_with_mut(DEFAULT_LOCK_TIMEOUT_US, |s| s.record_applied(&applied[..count]))
    }

    /// Effect engine, for inspection
    pub fn effects(&self) -> &EffectEngine {
        &self.effects
    }

    /// Duty driver, for inspection
    pub fn driver(&self) -> &DutyDriver<P> {
        &self.driver
    }

    fn install(&mut self, output: usize, instance: EffectInstance) {
        if output < self.outputs.len() {
            let _ = self.effects.install(output, instance);
        }
    }
}
