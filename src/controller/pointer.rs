//! Provides [`PointerSignal`], a normalized view of the pointer used by the idle blend.

use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

/// A raw pointer sample as delivered by the host, for mouse and touch input alike.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPointerEvent {
    /// The generic pointer position in logical pixels, origin at the top left of the viewport.
    pub position: Vec2,
    /// Positions of the touch points active in this event, if any.
    pub touches: Vec<Vec2>,
}

impl RawPointerEvent {
    /// A mouse sample at `position`.
    pub fn mouse(position: Vec2) -> Self {
        Self {
            position,
            touches: Vec::new(),
        }
    }

    /// A touch sample with the given active touch points.
    pub fn touch(touches: impl IntoIterator<Item = Vec2>) -> Self {
        let touches: Vec<Vec2> = touches.into_iter().collect();
        Self {
            position: touches.first().copied().unwrap_or_default(),
            touches,
        }
    }

    /// The position this event resolves to: the first touch point, falling back to the generic
    /// pointer position when there are no touch points.
    pub fn point(&self) -> Vec2 {
        self.touches.first().copied().unwrap_or(self.position)
    }

    /// More than one finger is down. Such events never start or continue a drag.
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// Continuous pointer state, in pixels and in viewport-relative coordinates.
#[derive(Debug, Clone, Reflect)]
pub struct PointerSignal {
    /// Raw position in logical pixels.
    pub position: Vec2,
    /// Position relative to the viewport center, `[-1, 1]` on both axes, y up.
    pub position_from_center: Vec2,
    /// Position as a fraction of the viewport, `[0, 1]` on both axes, y up.
    pub position_percent: Vec2,
    /// Latches to `true` after the first pointer event.
    pub moved: bool,
    /// Did the pointer move since the previous frame?
    pub moving: bool,
    prev_position: Vec2,
    viewport: Vec2,
}

impl Default for PointerSignal {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl PointerSignal {
    /// Create a signal for a viewport of `viewport` logical pixels, with the pointer at its center.
    pub fn new(viewport: Vec2) -> Self {
        let mut signal = Self {
            position: viewport * 0.5,
            position_from_center: Vec2::ZERO,
            position_percent: Vec2::ZERO,
            moved: false,
            moving: false,
            prev_position: Vec2::splat(-1.0),
            viewport,
        };
        signal.recompute();
        signal
    }

    /// The viewport size this signal normalizes against.
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Update the viewport size. A pointer that never moved stays at the center.
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        if !self.moved {
            self.position = viewport * 0.5;
        }
        self.recompute();
    }

    /// Feed a pointer event.
    pub fn on_event(&mut self, event: &RawPointerEvent) {
        self.position = event.point();
        self.recompute();
        self.moved = true;
    }

    /// Frame bookkeeping for [`PointerSignal::moving`]. Call exactly once per frame.
    pub fn update_frame(&mut self) {
        self.moving = self.prev_position != self.position;
        self.prev_position = self.position;
    }

    fn recompute(&mut self) {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            warn_once!("Pointer viewport has no area: {:?}", self.viewport);
            return;
        }
        let fraction = self.position / self.viewport;
        self.position_from_center = Vec2::new(fraction.x * 2.0 - 1.0, -fraction.y * 2.0 + 1.0)
            .clamp(Vec2::NEG_ONE, Vec2::ONE);
        let percent = fraction.clamp(Vec2::ZERO, Vec2::ONE);
        self.position_percent = Vec2::new(percent.x, 1.0 - percent.y);
    }
}
