//! Elastic return to the rest orientation after a drag is released.

use std::time::Duration;

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

use super::{
    limits::RotationLimits,
    tween::{Easing, Tween},
};

/// How strongly overshoot past the progressive zone adds springiness to the rebound.
const MAGNETIC_FORCE: f32 = 0.6;

/// Settings of the elastic rebound.
///
/// Only [`ElasticPhysics::duration`] shapes the rebound. The other fields are validated and kept
/// so they can be read back by callers that tune them.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ElasticPhysics {
    /// Spring stiffness, clamped to `[0.1, 1.0]` on update.
    pub stiffness: f32,
    /// Spring damping, clamped to `[0.1, 1.0]` on update.
    pub damping: f32,
    /// Spring mass, clamped to `[0.5, 5.0]` on update.
    pub mass: f32,
    /// Base rebound duration in seconds, clamped to `[0.5, 3.0]` on update.
    pub duration: f32,
}

impl Default for ElasticPhysics {
    fn default() -> Self {
        Self {
            stiffness: 0.05,
            damping: 0.03,
            mass: 0.2,
            duration: 2.5,
        }
    }
}

impl ElasticPhysics {
    /// Valid range of [`ElasticPhysics::stiffness`].
    pub const STIFFNESS: (f32, f32) = (0.1, 1.0);
    /// Valid range of [`ElasticPhysics::damping`].
    pub const DAMPING: (f32, f32) = (0.1, 1.0);
    /// Valid range of [`ElasticPhysics::mass`].
    pub const MASS: (f32, f32) = (0.5, 5.0);
    /// Valid range of [`ElasticPhysics::duration`].
    pub const DURATION: (f32, f32) = (0.5, 3.0);
}

/// An in-flight rebound toward the rest orientation.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Rebound {
    tween: Tween,
}

impl Rebound {
    /// Plan a rebound from `from` to `to`, given the overshoot ratios recorded during the drag.
    ///
    /// Longer excursions and larger overshoot both lengthen the return, and overshoot makes the
    /// oscillation stronger and snappier.
    pub fn plan(
        from: Vec2,
        to: Vec2,
        beyond: Vec2,
        limits: &RotationLimits,
        physics: &ElasticPhysics,
    ) -> Self {
        let severity = |beyond: f32, range: f32| {
            let half_range = range * 0.5;
            if half_range <= f32::EPSILON {
                0.0
            } else {
                (beyond / half_range).min(1.0)
            }
        };
        let beyond_factor = severity(beyond.x, limits.x.range_radians())
            .max(severity(beyond.y, limits.y.range_radians()));

        let total_distance = (from.x - to.x).abs() + (from.y - to.y).abs();
        let extra_springiness = beyond_factor * MAGNETIC_FORCE;

        let seconds = physics.duration * (1.0 + total_distance * (1.0 + extra_springiness * 0.5));
        let easing = Easing::ElasticOut {
            amplitude: 0.95 + extra_springiness * 0.15,
            period: (0.3 - extra_springiness * 0.2).max(0.15),
        };

        Self {
            tween: Tween::new(
                from,
                to,
                Duration::try_from_secs_f32(seconds).unwrap_or(Duration::ZERO),
                easing,
            ),
        }
    }

    /// Advance the rebound by `delta`, returning the orientation to apply.
    pub fn advance(&mut self, delta: Duration) -> Vec2 {
        self.tween.advance(delta)
    }

    /// Has the rebound reached its target?
    pub fn is_finished(&self) -> bool {
        self.tween.is_finished()
    }

    /// Total duration of the rebound.
    pub fn duration(&self) -> Duration {
        self.tween.duration()
    }

    /// The easing used by the rebound.
    pub fn easing(&self) -> Easing {
        self.tween.easing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::limits::AxisLimits;

    fn plan(from: Vec2, beyond: Vec2) -> Rebound {
        Rebound::plan(
            from,
            Vec2::ZERO,
            beyond,
            &RotationLimits::default(),
            &ElasticPhysics::default(),
        )
    }

    #[test]
    fn duration_scales_with_distance() {
        let near = plan(Vec2::new(0.1, 0.0), Vec2::ZERO);
        let far = plan(Vec2::new(0.5, 0.3), Vec2::ZERO);
        assert!((near.duration().as_secs_f32() - 2.5 * 1.1).abs() < 1e-4);
        assert!(far.duration() > near.duration());
    }

    #[test]
    fn overshoot_is_springier() {
        let calm = plan(Vec2::new(0.5, 0.0), Vec2::ZERO);
        let stretched = plan(Vec2::new(0.5, 0.0), Vec2::new(1.8, 0.0));
        assert!(stretched.duration() > calm.duration());

        let Easing::ElasticOut { amplitude, period } = stretched.easing() else {
            panic!("rebound must be elastic");
        };
        // Range of 60 degrees: 1.8 / (range / 2) exceeds 1, so the factor saturates.
        assert!((amplitude - (0.95 + 0.6 * 0.15)).abs() < 1e-5);
        assert!((period - 0.18).abs() < 1e-5);
        assert_eq!(
            calm.easing(),
            Easing::ElasticOut {
                amplitude: 0.95,
                period: 0.3
            }
        );
    }

    #[test]
    fn wide_limits_use_the_full_overshoot() {
        let limits = RotationLimits {
            x: AxisLimits::new(-30.0, 30.0),
            y: AxisLimits::new(-90.0, 90.0),
        };
        let plan_with = |beyond: f32| {
            Rebound::plan(
                Vec2::new(0.0, 1.57),
                Vec2::ZERO,
                Vec2::new(0.0, beyond),
                &limits,
                &ElasticPhysics::default(),
            )
        };
        // Half the y range is π/2, so a ratio of 1.2 only reaches about three quarters of it.
        let Easing::ElasticOut { amplitude, .. } = plan_with(1.2).easing() else {
            panic!("rebound must be elastic");
        };
        assert!(amplitude < 1.04 - 1e-3);

        let Easing::ElasticOut { amplitude, period } = plan_with(144.0 / 54.0).easing() else {
            panic!("rebound must be elastic");
        };
        assert!((amplitude - 1.04).abs() < 1e-5);
        assert!((period - 0.18).abs() < 1e-5);
    }

    #[test]
    fn settles_on_target() {
        for from in [
            Vec2::new(0.6, -0.9),
            Vec2::new(-0.1, 0.05),
            Vec2::new(0.0, 0.9),
        ] {
            let mut rebound = plan(from, Vec2::new(1.2, 0.7));
            let mut value = from;
            while !rebound.is_finished() {
                value = rebound.advance(Duration::from_millis(16));
            }
            assert!(value.length() < 1e-6);
        }
    }

    #[test]
    fn collapsed_limits_do_not_divide_by_zero() {
        let limits = RotationLimits {
            x: AxisLimits::new(0.0, 0.0),
            y: AxisLimits::new(0.0, 0.0),
        };
        let rebound = Rebound::plan(
            Vec2::new(0.2, 0.2),
            Vec2::ZERO,
            Vec2::ONE,
            &limits,
            &ElasticPhysics::default(),
        );
        assert!(rebound.duration().as_secs_f32().is_finite());
    }
}
