//! Enter transitions: easing curves and the per-primitive effects they drive.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    CubicOut,
    CubicInOut,
    /// Overshoots and settles (amplitude 1, period 0.3).
    ElasticOut,
}

/// `2^(-10t)` rescaled so that it reaches exactly 0 at `t = 1`.
fn tpmt(x: f64) -> f64 {
    (2f64.powf(-10.0 * x) - 0.0009765625) * 1.0009775171065494
}

impl Easing {
    /// Eased progress for `t` in `[0, 1]`; inputs outside are clamped.
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
            Easing::ElasticOut => {
                let p = 0.3 / TAU;
                let s = 1f64.asin() * p;
                1.0 - tpmt(t) * ((t + s) / p).sin()
            }
        }
    }
}

/// What an enter transition animates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Rect grows upward from `baseline` (pixel y) while fading in.
    Grow { baseline: f64 },
    /// Circle radius grows from zero.
    Expand,
    /// Path is drawn from its start to its end.
    Reveal,
    /// Opacity rises from zero.
    FadeIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
    pub effect: Effect,
}

impl Transition {
    pub fn new(effect: Effect, duration_ms: f64, easing: Easing) -> Self {
        Self {
            delay_ms: 0.0,
            duration_ms,
            easing,
            effect,
        }
    }

    pub fn delayed(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Eased progress at `elapsed_ms` since the redraw started.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        let local = elapsed_ms - self.delay_ms;
        if local <= 0.0 {
            return self.easing.apply(0.0);
        }
        if self.duration_ms <= 0.0 || local >= self.duration_ms {
            return 1.0;
        }
        self.easing.apply(local / self.duration_ms)
    }

    pub fn end_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms
    }

    pub fn is_done(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.end_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easings_hit_endpoints() {
        for e in [
            Easing::Linear,
            Easing::CubicOut,
            Easing::CubicInOut,
            Easing::ElasticOut,
        ] {
            assert!(e.apply(0.0).abs() < 1e-9, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-9, "{e:?} at 1");
        }
    }

    #[test]
    fn elastic_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::ElasticOut.apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn cubic_out_is_ahead_of_linear() {
        assert!(Easing::CubicOut.apply(0.5) > 0.5);
        assert_eq!(Easing::CubicInOut.apply(0.5), 0.5);
    }

    #[test]
    fn progress_respects_delay() {
        let t = Transition::new(Effect::FadeIn, 500.0, Easing::Linear).delayed(100.0);
        assert_eq!(t.progress(50.0), 0.0);
        assert!((t.progress(350.0) - 0.5).abs() < 1e-9);
        assert_eq!(t.progress(600.0), 1.0);
        assert!(t.is_done(600.0));
        assert!(!t.is_done(599.0));
    }
}
