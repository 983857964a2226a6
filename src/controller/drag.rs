//! Converts a single-pointer drag into a candidate orientation with soft limits.

use std::f32::consts::PI;

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

use super::limits::{RotationLimits, SoftClamp};

/// State of an active drag. Created on press, dropped on release.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct DragState {
    /// Pointer position when the press started, in logical pixels.
    pub start_position: Vec2,
    /// Model orientation (x, y) when the press started, in radians.
    pub start_rotation: Vec2,
    /// Latest pointer delta, normalized so that a full viewport width or height is `2.0`.
    pub delta: Vec2,
    /// Overshoot ratio per axis, see [`SoftClamp::beyond`].
    pub beyond: Vec2,
    /// Cubic resistance per axis, see [`SoftClamp::resistance`].
    pub resistance: Vec2,
}

/// The orientation a drag resolves to for one pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRotation {
    /// The unconstrained rotation, in radians.
    pub raw: Vec2,
    /// The soft-clamped rotation to apply, in radians.
    pub applied: Vec2,
}

impl DragState {
    /// Start a drag at `position` from the current model orientation.
    pub fn new(position: Vec2, start_rotation: Vec2) -> Self {
        Self {
            start_position: position,
            start_rotation,
            delta: Vec2::ZERO,
            beyond: Vec2::ZERO,
            resistance: Vec2::ZERO,
        }
    }

    /// Resolve the orientation for a pointer at `position`, recording delta and overshoot.
    ///
    /// Vertical motion tilts about the X axis, horizontal motion turns about the Y axis. Dragging
    /// across the whole viewport rotates by `2π`.
    pub fn drag_to(
        &mut self,
        position: Vec2,
        viewport: Vec2,
        limits: &RotationLimits,
    ) -> DragRotation {
        self.delta = if viewport.x > 0.0 && viewport.y > 0.0 {
            (position - self.start_position) / viewport * 2.0
        } else {
            Vec2::ZERO
        };

        let raw = Vec2::new(
            self.start_rotation.x + self.delta.y * PI,
            self.start_rotation.y + self.delta.x * PI,
        );

        let x: SoftClamp = limits.x.soft_clamp(raw.x);
        let y: SoftClamp = limits.y.soft_clamp(raw.y);
        self.beyond = Vec2::new(x.beyond, y.beyond);
        self.resistance = Vec2::new(x.resistance, y.resistance);

        DragRotation {
            raw,
            applied: Vec2::new(x.value, y.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(1000.0, 500.0);

    #[test]
    fn cross_axis_mapping() {
        let mut drag = DragState::new(Vec2::new(500.0, 250.0), Vec2::ZERO);
        // A fortieth of the width to the right turns about Y by 0.05 * π.
        let rotation = drag.drag_to(Vec2::new(525.0, 250.0), VIEWPORT, &RotationLimits::default());
        assert_eq!(rotation.raw.x, 0.0);
        assert!((rotation.raw.y - 0.05 * PI).abs() < 1e-6);
        assert_eq!(rotation.applied, rotation.raw);

        let rotation = drag.drag_to(Vec2::new(500.0, 260.0), VIEWPORT, &RotationLimits::default());
        assert!((rotation.raw.x - 0.04 * PI).abs() < 1e-6);
        assert_eq!(rotation.raw.y, 0.0);
    }

    #[test]
    fn records_overshoot() {
        let mut drag = DragState::new(Vec2::ZERO, Vec2::ZERO);
        let rotation = drag.drag_to(Vec2::new(0.0, 500.0), VIEWPORT, &RotationLimits::default());
        assert!(rotation.applied.x < rotation.raw.x);
        assert!(drag.beyond.x > 0.0);
        assert_eq!(drag.beyond.y, 0.0);

        // Back inside the zone clears the overshoot.
        drag.drag_to(Vec2::new(0.0, 10.0), VIEWPORT, &RotationLimits::default());
        assert_eq!(drag.beyond, Vec2::ZERO);
    }

    #[test]
    fn degenerate_viewport_does_not_move() {
        let mut drag = DragState::new(Vec2::ZERO, Vec2::new(0.1, 0.2));
        let rotation = drag.drag_to(Vec2::splat(300.0), Vec2::ZERO, &RotationLimits::default());
        assert_eq!(rotation.applied, Vec2::new(0.1, 0.2));
    }
}
