//! Provides [`RotationLimits`] settings and the soft clamp applied while dragging.

use bevy_reflect::Reflect;

/// Fraction of an axis range, measured inward from each edge, where resistance applies.
pub const PROGRESSIVE_ZONE: f32 = 0.3;

/// How far past the progressive zone a drag may pull, relative to the slack between the zone
/// boundary and the hard limit.
pub const OVERSHOOT_ALLOWANCE: f32 = 1.2;

/// Bound model rotation per axis, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct RotationLimits {
    /// Limits of the tilt about the X axis, driven by vertical pointer motion.
    pub x: AxisLimits,
    /// Limits of the turn about the Y axis, driven by horizontal pointer motion.
    pub y: AxisLimits,
}

impl Default for RotationLimits {
    fn default() -> Self {
        Self {
            x: AxisLimits::new(-30.0, 30.0),
            y: AxisLimits::new(-45.0, 45.0),
        }
    }
}

/// The `[min, max]` range of one rotation axis, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AxisLimits {
    /// Lower bound, in degrees.
    pub min: f32,
    /// Upper bound, in degrees.
    pub max: f32,
}

/// The result of [`AxisLimits::soft_clamp`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SoftClamp {
    /// The rotation to apply, in radians.
    pub value: f32,
    /// How far the raw value reached past the progressive zone, as a ratio of the zone slack. Zero
    /// inside the zone. Not capped: it keeps growing with the raw value even once `value` is
    /// clamped, around [`OVERSHOOT_ALLOWANCE`] at the clamp point.
    pub beyond: f32,
    /// Cubic resistance in `[0, ..)`, `1.0` once the raw value reaches the end of the allowed
    /// overshoot. Reported for feedback only, it does not attenuate `value`.
    pub resistance: f32,
}

impl AxisLimits {
    /// Limits from degrees.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Lower bound in radians.
    pub fn min_radians(&self) -> f32 {
        self.min.to_radians()
    }

    /// Upper bound in radians.
    pub fn max_radians(&self) -> f32 {
        self.max.to_radians()
    }

    /// Width of the range in radians.
    pub fn range_radians(&self) -> f32 {
        self.max_radians() - self.min_radians()
    }

    /// Clamp a radian value to the hard limits.
    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min_radians()).min(self.max_radians())
    }

    /// The inner region, in radians, where drag input passes through unmodified.
    pub fn progressive_zone(&self) -> (f32, f32) {
        let slack = self.range_radians() * PROGRESSIVE_ZONE;
        (self.min_radians() + slack, self.max_radians() - slack)
    }

    /// Apply drag resistance to a raw rotation, in radians.
    ///
    /// Values inside the progressive zone are returned unchanged. Past the zone boundary the value
    /// is clamped to `boundary ± slack * OVERSHOOT_ALLOWANCE`, where the slack is the distance from
    /// the zone boundary to the hard limit. A degenerate range with no slack clamps exactly at the
    /// edge.
    pub fn soft_clamp(&self, raw: f32) -> SoftClamp {
        let (zone_min, zone_max) = self.progressive_zone();
        let slack = zone_min - self.min_radians();

        let (boundary, beyond_dist, sign) = if raw < zone_min {
            (zone_min, zone_min - raw, -1.0)
        } else if raw > zone_max {
            (zone_max, raw - zone_max, 1.0)
        } else {
            return SoftClamp {
                value: raw,
                ..Default::default()
            };
        };

        if slack <= f32::EPSILON {
            return SoftClamp {
                value: boundary,
                ..Default::default()
            };
        }

        let max_allowed_beyond = slack * OVERSHOOT_ALLOWANCE;
        let value = if sign < 0.0 {
            raw.max(boundary - max_allowed_beyond)
        } else {
            raw.min(boundary + max_allowed_beyond)
        };

        SoftClamp {
            value,
            beyond: beyond_dist / slack,
            resistance: (beyond_dist / max_allowed_beyond).powi(3),
        }
    }
}
