//! Idle cursor-follow: the model subtly tilts toward the pointer when nobody is dragging it.

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

use super::limits::RotationLimits;

/// Settings of the idle cursor-follow.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CursorFollow {
    /// Should the model follow the cursor when idle?
    pub enabled: bool,
    /// Fraction of the remaining distance covered each frame, in `(0, 1]`.
    pub smoothing: f32,
    /// Rotation in degrees when the pointer sits on the edge of the viewport.
    pub max_angle: f32,
    /// Invert the turn about Y driven by horizontal pointer position.
    pub invert_x: bool,
    /// Invert the tilt about X driven by vertical pointer position.
    pub invert_y: bool,
    /// Constant tilt about X added to the target, in degrees.
    pub rotation_offset_x: f32,
    /// Constant turn about Y added to the target, in degrees.
    pub rotation_offset_y: f32,
}

impl Default for CursorFollow {
    fn default() -> Self {
        Self {
            enabled: true,
            smoothing: 0.05,
            max_angle: 25.0,
            invert_x: false,
            invert_y: false,
            rotation_offset_x: 0.0,
            rotation_offset_y: 0.0,
        }
    }
}

impl CursorFollow {
    /// The smallest smoothing factor accepted on update.
    pub const MIN_SMOOTHING: f32 = 1e-3;

    /// The orientation the model should settle on for a pointer at `from_center`, clamped to the
    /// hard limits.
    pub fn target(&self, rest: Vec2, from_center: Vec2, limits: &RotationLimits) -> Vec2 {
        let x_factor = if self.invert_x { -1.0 } else { 1.0 };
        let y_factor = if self.invert_y { -1.0 } else { 1.0 };
        let max_angle = self.max_angle.to_radians();

        let x = rest.x + from_center.y * max_angle * y_factor + self.rotation_offset_x.to_radians();
        let y = rest.y + from_center.x * max_angle * x_factor + self.rotation_offset_y.to_radians();

        Vec2::new(limits.x.clamp(x), limits.y.clamp(y))
    }
}

/// Exponential smoothing of the orientation toward a target, one step per frame.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct IdleBlend {
    /// The destination of the blend, in radians.
    pub target: Vec2,
}

impl IdleBlend {
    /// Retarget and move `current` one smoothing step toward the new target. Never jumps.
    pub fn step(&mut self, current: Vec2, target: Vec2, smoothing: f32) -> Vec2 {
        self.target = target;
        current + (target - current) * smoothing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_follows_pointer() {
        let follow = CursorFollow::default();
        let limits = RotationLimits::default();

        let target = follow.target(Vec2::ZERO, Vec2::new(1.0, 0.5), &limits);
        assert!((target.x - 12.5f32.to_radians()).abs() < 1e-6);
        assert!((target.y - 25f32.to_radians()).abs() < 1e-6);

        let inverted = CursorFollow {
            invert_x: true,
            invert_y: true,
            ..follow
        };
        let target = inverted.target(Vec2::ZERO, Vec2::new(1.0, 0.5), &limits);
        assert!((target.x + 12.5f32.to_radians()).abs() < 1e-6);
        assert!((target.y + 25f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn target_is_clamped() {
        let follow = CursorFollow {
            max_angle: 90.0,
            rotation_offset_x: 20.0,
            ..Default::default()
        };
        let limits = RotationLimits::default();
        let target = follow.target(Vec2::ZERO, Vec2::ONE, &limits);
        assert!((target.x - limits.x.max_radians()).abs() < 1e-6);
        assert!((target.y - limits.y.max_radians()).abs() < 1e-6);
    }

    #[test]
    fn converges_geometrically() {
        let mut blend = IdleBlend { target: Vec2::ZERO };
        let target = Vec2::new(0.3, -0.2);
        let start = Vec2::new(-0.2, 0.4);
        let smoothing = 0.05;

        let mut current = start;
        for n in 1..=60 {
            current = blend.step(current, target, smoothing);
            let expected = (start - target).length() * (1.0 - smoothing).powi(n);
            assert!(((current - target).length() - expected).abs() < 1e-5);
        }
        assert_eq!(blend.target, target);
    }
}
