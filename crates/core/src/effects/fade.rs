//! Fade effect
//!
//! Ramps an output linearly up when it is switched on and down when it is
//! switched off. The ramp restarts on every change of commanded power:
//!
//! ```text
//!         off->on                    on->off
//!   Idle ---------> FadingIn ---+    ------> FadingOut ---+
//!                      |        |                 |       |
//!                      | t>=in  |                 | t>=out|
//!                      v        |                 v       |
//!                   SteadyOn <--+             SteadyOff <-+
//! ```
//!
//! Arguments: `"<fade_in_seconds>,<fade_out_seconds>"`, both optional,
//! default 1 s each.

use core::fmt::Write;

use super::{Effect, EffectArgs};

/// Default fade duration in seconds
pub const DEFAULT_FADE_SECONDS: f32 = 1.0;

/// Current phase of a fade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePhase {
    Idle,
    FadingIn,
    SteadyOn,
    FadingOut,
    SteadyOff,
}

/// Per-output fade state
#[derive(Debug, Clone, PartialEq)]
pub struct FadeContext {
    fade_in: f32,
    fade_out: f32,
    in_us: i64,
    out_us: i64,
    last_power: bool,
    phase: FadePhase,
    start_us: u64,
}

impl FadeContext {
    /// Fade with explicit durations in seconds
    pub fn new(fade_in: f32, fade_out: f32) -> Self {
        Self {
            fade_in,
            fade_out,
            in_us: (fade_in * 1_000_000.0) as i64,
            out_us: (fade_out * 1_000_000.0) as i64,
            last_power: false,
            phase: FadePhase::Idle,
            start_us: 0,
        }
    }

    /// Fade-in duration in seconds
    pub fn fade_in(&self) -> f32 {
        self.fade_in
    }

    /// Fade-out duration in seconds
    pub fn fade_out(&self) -> f32 {
        self.fade_out
    }

    /// Current phase
    pub fn phase(&self) -> FadePhase {
        self.phase
    }
}

impl Default for FadeContext {
    fn default() -> Self {
        Self::new(DEFAULT_FADE_SECONDS, DEFAULT_FADE_SECONDS)
    }
}

fn parse_seconds(token: Option<&str>) -> Option<f32> {
    token?
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
}

impl Effect for FadeContext {
    const NAME: &'static str = "fade";

    fn parse(args: &str) -> Option<Self> {
        let mut fields = args.split(',');
        let fade_in = parse_seconds(fields.next()).unwrap_or(DEFAULT_FADE_SECONDS);
        let fade_out = parse_seconds(fields.next()).unwrap_or(DEFAULT_FADE_SECONDS);
        Some(Self::new(fade_in, fade_out))
    }

    fn format(&self) -> EffectArgs {
        let mut args = EffectArgs::new();
        let _ = write!(args, "{:.6},{:.6}", self.fade_in, self.fade_out);
        args
    }

    fn apply(&mut self, now_us: u64, duty: u8, power: bool) -> u8 {
        let target = duty as i64;

        let out = if power != self.last_power {
            self.start_us = now_us;
            if power {
                self.phase = FadePhase::FadingIn;
                0
            } else {
                self.phase = FadePhase::FadingOut;
                target
            }
        } else {
            let elapsed = now_us.saturating_sub(self.start_us) as i64;
            match self.phase {
                FadePhase::Idle | FadePhase::SteadyOff => 0,
                FadePhase::SteadyOn => target,
                FadePhase::FadingIn => {
                    if elapsed < self.in_us {
                        target * elapsed / self.in_us
                    } else {
                        self.phase = FadePhase::SteadyOn;
                        target
                    }
                }
                FadePhase::FadingOut => {
                    if elapsed < self.out_us {
                        target - target * elapsed / self.out_us
                    } else {
                        self.phase = FadePhase::SteadyOff;
                        0
                    }
                }
            }
        };

        self.last_power = power;
        out as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_arguments() {
        let ctx = FadeContext::parse("").unwrap();
        assert_eq!(ctx.fade_in(), 1.0);
        assert_eq!(ctx.fade_out(), 1.0);
        assert_eq!(ctx, FadeContext::default());
        assert_eq!(ctx.format().as_str(), "1.000000,1.000000");
    }

    #[test]
    fn test_parse_arguments() {
        let ctx = FadeContext::parse("2.5,0.25").unwrap();
        assert_eq!((ctx.fade_in(), ctx.fade_out()), (2.5, 0.25));

        let ctx = FadeContext::parse(" 3 ").unwrap();
        assert_eq!((ctx.fade_in(), ctx.fade_out()), (3.0, 1.0));

        let ctx = FadeContext::parse(",4").unwrap();
        assert_eq!((ctx.fade_in(), ctx.fade_out()), (1.0, 4.0));

        let ctx = FadeContext::parse("0,0").unwrap();
        assert_eq!((ctx.fade_in(), ctx.fade_out()), (0.0, 0.0));
    }

    #[test]
    fn test_negative_and_malformed_keep_defaults() {
        let ctx = FadeContext::parse("-2,0.5").unwrap();
        assert_eq!((ctx.fade_in(), ctx.fade_out()), (1.0, 0.5));

        let ctx = FadeContext::parse("abc,2").unwrap();
        assert_eq!((ctx.fade_in(), ctx.fade_out()), (1.0, 2.0));

        let ctx = FadeContext::parse("2,1.5x").unwrap();
        assert_eq!((ctx.fade_in(), ctx.fade_out()), (2.0, 1.0));

        let ctx = FadeContext::parse("inf,NaN").unwrap();
        assert_eq!((ctx.fade_in(), ctx.fade_out()), (1.0, 1.0));
    }

    #[test]
    fn test_format_round_trip() {
        for (fade_in, fade_out) in [
            (0.0, 0.0),
            (1.0, 1.0),
            (2.5, 0.125),
            (0.1234567, 9.87654),
            (12345.678, 0.000001),
            (600.0, 3600.0),
        ] {
            let formatted = FadeContext::new(fade_in, fade_out).format();
            let reparsed = FadeContext::parse(&formatted).unwrap();
            assert_eq!(reparsed.format(), formatted);
        }
    }

    #[test]
    fn test_fade_scenario() {
        let mut ctx = FadeContext::parse("2.0,1.0").unwrap();

        // Power starts off: nothing has happened yet
        assert_eq!(ctx.apply(0, 80, false), 0);
        assert_eq!(ctx.phase(), FadePhase::Idle);

        // off -> on at t=0
        assert_eq!(ctx.apply(0, 80, true), 0);
        assert_eq!(ctx.phase(), FadePhase::FadingIn);
        assert_eq!(ctx.apply(500_000, 80, true), 20);
        assert_eq!(ctx.apply(1_000_000, 80, true), 40);
        assert_eq!(ctx.apply(1_999_999, 80, true), 79);
        assert_eq!(ctx.apply(2_000_000, 80, true), 80);
        assert_eq!(ctx.phase(), FadePhase::SteadyOn);
        assert_eq!(ctx.apply(9_000_000, 80, true), 80);

        // on -> off at t=2s starts from the full target
        let mut ctx = FadeContext::parse("2.0,1.0").unwrap();
        ctx.apply(0, 80, true);
        ctx.apply(2_000_000, 80, true);
        assert_eq!(ctx.apply(2_000_000, 80, false), 80);
        assert_eq!(ctx.phase(), FadePhase::FadingOut);
        assert_eq!(ctx.apply(2_500_000, 80, false), 40);
        assert_eq!(ctx.apply(3_000_000, 80, false), 0);
        assert_eq!(ctx.phase(), FadePhase::SteadyOff);
        assert_eq!(ctx.apply(10_000_000, 80, false), 0);
    }

    #[test]
    fn test_ramp_truncates() {
        let mut ctx = FadeContext::parse("3,3").unwrap();
        ctx.apply(0, 100, true);
        // 100 * 1_000_000 / 3_000_000 = 33.3
        assert_eq!(ctx.apply(1_000_000, 100, true), 33);
        // 100 * 2_000_000 / 3_000_000 = 66.6
        assert_eq!(ctx.apply(2_000_000, 100, true), 66);

        ctx.apply(5_000_000, 100, false);
        // 100 - 33.3 truncated inside the product term
        assert_eq!(ctx.apply(6_000_000, 100, false), 67);
    }

    #[test]
    fn test_reversal_mid_fade_restarts_phase() {
        let mut ctx = FadeContext::parse("1,1").unwrap();
        ctx.apply(0, 50, true);
        assert_eq!(ctx.apply(400_000, 50, true), 20);

        // Switching off mid-ramp jumps to the target and fades from there
        assert_eq!(ctx.apply(500_000, 50, false), 50);
        assert_eq!(ctx.apply(1_000_000, 50, false), 25);

        assert_eq!(ctx.apply(1_100_000, 50, true), 0);
        assert_eq!(ctx.phase(), FadePhase::FadingIn);
    }

    #[test]
    fn test_zero_duration_switches_immediately() {
        let mut ctx = FadeContext::parse("0,0").unwrap();
        assert_eq!(ctx.apply(10, 70, true), 0);
        assert_eq!(ctx.apply(20, 70, true), 70);
        assert_eq!(ctx.apply(30, 70, false), 70);
        assert_eq!(ctx.apply(40, 70, false), 0);
    }

    #[test]
    fn test_target_change_during_steady_on_is_followed() {
        let mut ctx = FadeContext::parse("0,0").unwrap();
        ctx.apply(0, 70, true);
        ctx.apply(1, 70, true);
        assert_eq!(ctx.apply(2, 30, true), 30);
    }
}
