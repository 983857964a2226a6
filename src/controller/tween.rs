//! A small, time-driven interpolation facility.
//!
//! A [`Tween`] does not own a clock. The caller advances it with the frame delta and applies the
//! returned value, which keeps the animation cancelable at any point by simply dropping it.

use std::{f32::consts::TAU, time::Duration};

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

/// The shape of a [`Tween`] over its normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Overshoots the end value and settles with a decaying oscillation.
    ElasticOut {
        /// Oscillation amplitude. Values below `1.0` are treated as `1.0` for the swing, and shorten
        /// the effective period instead.
        amplitude: f32,
        /// Oscillation period as a fraction of the tween. Lower is snappier.
        period: f32,
    },
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` to eased progress. Always returns exactly `0.0` at the
    /// start and `1.0` at the end.
    pub fn ease(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::ElasticOut { amplitude, period } => {
                if t <= 0.0 {
                    return 0.0;
                }
                if t >= 1.0 {
                    return 1.0;
                }
                let swing = amplitude.max(1.0);
                let cycle = period.max(f32::EPSILON) / amplitude.clamp(f32::EPSILON, 1.0);
                let phase = cycle / TAU * (1.0 / swing).asin();
                swing * 2f32.powf(-10.0 * t) * ((t - phase) * TAU / cycle).sin() + 1.0
            }
        }
    }
}

/// Interpolates a [`Vec2`] from `start` to `end` over `duration`.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Tween {
    start: Vec2,
    end: Vec2,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    /// A tween that has not started advancing yet.
    pub fn new(start: Vec2, end: Vec2, duration: Duration, easing: Easing) -> Self {
        Self {
            start,
            end,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// Advance by `delta` and return the interpolated value.
    pub fn advance(&mut self, delta: Duration) -> Vec2 {
        self.elapsed = (self.elapsed + delta).min(self.duration);
        self.value()
    }

    /// The value at the current progress. Returns `end` exactly once finished.
    pub fn value(&self) -> Vec2 {
        if self.is_finished() {
            return self.end;
        }
        self.start + (self.end - self.start) * self.easing.ease(self.progress())
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Has the whole duration elapsed?
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Total duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The easing curve.
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// The value the tween ends on.
    pub fn end(&self) -> Vec2 {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elastic_endpoints() {
        for (amplitude, period) in [(0.95, 0.3), (1.04, 0.18), (1.0, 0.15), (0.5, 0.45)] {
            let easing = Easing::ElasticOut { amplitude, period };
            assert_eq!(easing.ease(0.0), 0.0);
            assert_eq!(easing.ease(1.0), 1.0);
            assert!(easing.ease(1e-4).abs() < 0.05);
        }
    }

    #[test]
    fn elastic_overshoots() {
        let easing = Easing::ElasticOut {
            amplitude: 0.95,
            period: 0.3,
        };
        let peak = (1..100)
            .map(|i| easing.ease(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn advances_to_end() {
        let mut tween = Tween::new(
            Vec2::new(1.0, -1.0),
            Vec2::ZERO,
            Duration::from_millis(500),
            Easing::Linear,
        );
        let half = tween.advance(Duration::from_millis(250));
        assert!((half - Vec2::new(0.5, -0.5)).length() < 1e-5);
        assert!(!tween.is_finished());
        assert_eq!(tween.advance(Duration::from_secs(10)), Vec2::ZERO);
        assert!(tween.is_finished());
    }

    #[test]
    fn zero_duration_is_finished() {
        let tween = Tween::new(Vec2::ONE, Vec2::ZERO, Duration::ZERO, Easing::Linear);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), Vec2::ZERO);
    }
}
