//! Runtime output effects
//!
//! An effect turns the commanded power/duty of an output into the duty that
//! is actually applied on each control tick. Every effect kind implements
//! [`Effect`] over its own private context; the [`EffectEngine`] owns one
//! optional instance per output, selected by name at configuration time.

pub mod fade;

use core::fmt;

use heapless::String;

use crate::output::OUTPUT_MAX_COUNT;

pub use fade::{FadeContext, FadePhase};

/// Maximum length of a formatted effect argument string
pub const EFFECT_ARGS_LEN: usize = 96;

/// Formatted effect arguments
pub type EffectArgs = String<EFFECT_ARGS_LEN>;

/// Effect behaviour shared by all effect kinds
pub trait Effect: Sized {
    /// Name used in configuration
    const NAME: &'static str;

    /// Build a context from a comma-separated argument string.
    fn parse(args: &str) -> Option<Self>;

    /// Serialize the arguments back into the form `parse` accepts.
    fn format(&self) -> EffectArgs;

    /// Compute the duty (0-100) to apply at `now_us` for the commanded
    /// `duty` and `power`. Called once per control tick.
    fn apply(&mut self, now_us: u64, duty: u8, power: bool) -> u8;
}

/// Known effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Fade,
}

impl EffectKind {
    /// All effect kinds, in listing order
    pub const ALL: [EffectKind; 1] = [EffectKind::Fade];

    /// Look up an effect by (case-insensitive) name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Configuration name
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Fade => FadeContext::NAME,
        }
    }
}

/// Effect engine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectError {
    /// Output index not in 0..16
    OutputOutOfRange(usize),
    /// No effect with this name
    UnknownEffect,
    /// Effect refused the argument string
    InvalidArguments,
}

impl fmt::Display for EffectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectError::OutputOutOfRange(output) => {
                write!(f, "output index {} out of range", output)
            }
            EffectError::UnknownEffect => write!(f, "unknown effect"),
            EffectError::InvalidArguments => write!(f, "invalid effect arguments"),
        }
    }
}

/// Owned effect instance of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum EffectInstance {
    Fade(FadeContext),
}

impl EffectInstance {
    /// Parse `args` for the given kind
    pub fn new(kind: EffectKind, args: &str) -> Option<Self> {
        match kind {
            EffectKind::Fade => FadeContext::parse(args).map(EffectInstance::Fade),
        }
    }

    /// Kind of this instance
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectInstance::Fade(_) => EffectKind::Fade,
        }
    }

    /// Formatted arguments
    pub fn format(&self) -> EffectArgs {
        match self {
            EffectInstance::Fade(ctx) => ctx.format(),
        }
    }

    /// Duty to apply this tick
    pub fn apply(&mut self, now_us: u64, duty: u8, power: bool) -> u8 {
        match self {
            EffectInstance::Fade(ctx) => ctx.apply(now_us, duty, power),
        }
    }
}

const NO_EFFECT: Option<EffectInstance> = None;

/// Per-output effect slots
///
/// Must be driven from a single call site at a regular tick: effects detect
/// power changes between consecutive calls.
pub struct EffectEngine {
    slots: [Option<EffectInstance>; OUTPUT_MAX_COUNT],
}

impl EffectEngine {
    /// Engine with no effects attached
    pub const fn new() -> Self {
        Self {
            slots: [NO_EFFECT; OUTPUT_MAX_COUNT],
        }
    }

    /// Attach (or replace) the effect of an output.
    pub fn attach(
        &mut self,
        output: usize,
        kind: EffectKind,
        args: &str,
    ) -> Result<(), EffectError> {
        if output >= OUTPUT_MAX_COUNT {
            return Err(EffectError::OutputOutOfRange(output));
        }
        let instance = EffectInstance::new(kind, args).ok_or(EffectError::InvalidArguments)?;
        self.install(output, instance)
    }

    /// Install an already parsed instance, replacing any current effect.
    pub fn install(
        &mut self,
        output: usize,
        instance: EffectInstance,
    ) -> Result<(), EffectError> {
        let slot = self
            .slots
            .get_mut(output)
            .ok_or(EffectError::OutputOutOfRange(output))?;
        *slot = Some(instance);
        Ok(())
    }

    /// Attach an effect by configuration name.
    pub fn attach_by_name(
        &mut self,
        output: usize,
        name: &str,
        args: &str,
    ) -> Result<(), EffectError> {
        let kind = EffectKind::from_name(name).ok_or(EffectError::UnknownEffect)?;
        self.attach(output, kind, args)
    }

    /// Remove the effect of an output; returns the removed instance.
    pub fn detach(&mut self, output: usize) -> Option<EffectInstance> {
        self.slots.get_mut(output).and_then(Option::take)
    }

    /// Effect attached to an output
    pub fn effect(&self, output: usize) -> Option<&EffectInstance> {
        self.slots.get(output).and_then(Option::as_ref)
    }

    /// Duty to apply to `output` this tick.
    ///
    /// Without an effect the output follows power directly.
    pub fn apply(&mut self, output: usize, now_us: u64, duty: u8, power: bool) -> u8 {
        match self.slots.get_mut(output).and_then(Option::as_mut) {
            Some(effect) => effect.apply(now_us, duty, power),
            None if power => duty,
            None => 0,
        }
    }
}

impl Default for EffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_name_lookup() {
        assert_eq!(EffectKind::from_name("fade"), Some(EffectKind::Fade));
        assert_eq!(EffectKind::from_name(" FADE "), Some(EffectKind::Fade));
        assert_eq!(EffectKind::from_name("blink"), None);
        assert_eq!(EffectKind::Fade.name(), "fade");
    }

    #[test]
    fn test_no_effect_follows_power() {
        let mut engine = EffectEngine::new();
        assert_eq!(engine.apply(0, 0, 60, true), 60);
        assert_eq!(engine.apply(0, 1, 60, false), 0);
        assert_eq!(engine.apply(99, 1, 60, true), 60);
    }

    #[test]
    fn test_attach_apply_detach() {
        let mut engine = EffectEngine::new();
        engine.attach_by_name(3, "fade", "2,1").unwrap();

        assert_eq!(engine.effect(3).map(EffectInstance::kind), Some(EffectKind::Fade));
        assert_eq!(engine.effect(3).unwrap().format().as_str(), "2.000000,1.000000");

        assert_eq!(engine.apply(3, 0, 80, true), 0);
        assert_eq!(engine.apply(3, 500_000, 80, true), 20);
        // Other outputs are unaffected
        assert_eq!(engine.apply(2, 500_000, 80, true), 80);

        let removed = engine.detach(3);
        assert!(matches!(removed, Some(EffectInstance::Fade(_))));
        assert!(engine.effect(3).is_none());
        assert_eq!(engine.apply(3, 600_000, 80, true), 80);
    }

    #[test]
    fn test_reattach_resets_context() {
        let mut engine = EffectEngine::new();
        engine.attach(0, EffectKind::Fade, "1,1").unwrap();
        engine.apply(0, 0, 100, true);
        engine.apply(0, 2_000_000, 100, true);

        engine.attach(0, EffectKind::Fade, "1,1").unwrap();
        // Fresh context sees the on state as a new edge
        assert_eq!(engine.apply(0, 3_000_000, 100, true), 0);
    }

    #[test]
    fn test_attach_errors() {
        let mut engine = EffectEngine::new();
        assert_eq!(
            engine.attach_by_name(0, "sparkle", ""),
            Err(EffectError::UnknownEffect)
        );
        assert_eq!(
            engine.attach(OUTPUT_MAX_COUNT, EffectKind::Fade, ""),
            Err(EffectError::OutputOutOfRange(OUTPUT_MAX_COUNT))
        );
        assert!(engine.detach(OUTPUT_MAX_COUNT).is_none());
    }
}
