//! Runtime-tunable parameters and the partial updates that are merged into them.
//!
//! Every update type uses `Option` fields: `None` leaves the current value untouched, so updates
//! from a settings panel can be sent field by field.

use bevy_color::Srgba;
use bevy_ecs::prelude::*;
use bevy_reflect::prelude::*;

use super::{
    follow::CursorFollow,
    limits::{AxisLimits, RotationLimits},
    rebound::ElasticPhysics,
};

/// The tunable parameters of one [`ModelViewer`](crate::controller::component::ModelViewer).
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct ViewerParams {
    /// Per-axis rotation limits.
    pub rotation_limits: RotationLimits,
    /// Rebound settings.
    pub elastic_physics: ElasticPhysics,
    /// Idle cursor-follow settings.
    pub cursor_follow: CursorFollow,
}

/// A partial update of [`AxisLimits`], in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisLimitsUpdate {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

/// A partial update of [`RotationLimits`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationLimitsUpdate {
    pub x: Option<AxisLimitsUpdate>,
    pub y: Option<AxisLimitsUpdate>,
}

/// A partial update of [`ElasticPhysics`]. Values are clamped to their valid ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElasticPhysicsUpdate {
    pub stiffness: Option<f32>,
    pub damping: Option<f32>,
    pub mass: Option<f32>,
    pub duration: Option<f32>,
}

/// A partial update of [`CursorFollow`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorFollowUpdate {
    pub enabled: Option<bool>,
    /// Clamped to `(0, 1]`.
    pub smoothing: Option<f32>,
    pub max_angle: Option<f32>,
    pub invert_x: Option<bool>,
    pub invert_y: Option<bool>,
    pub rotation_offset_x: Option<f32>,
    pub rotation_offset_y: Option<f32>,
}

impl AxisLimits {
    /// Merge a partial update.
    pub fn merge(&mut self, update: AxisLimitsUpdate) {
        if let Some(min) = update.min {
            self.min = min;
        }
        if let Some(max) = update.max {
            self.max = max;
        }
    }
}

impl RotationLimits {
    /// Merge a partial update.
    pub fn merge(&mut self, update: RotationLimitsUpdate) {
        if let Some(x) = update.x {
            self.x.merge(x);
        }
        if let Some(y) = update.y {
            self.y.merge(y);
        }
    }
}

impl ElasticPhysics {
    /// Merge a partial update, clamping each field to its valid range.
    pub fn merge(&mut self, update: ElasticPhysicsUpdate) {
        let clamp = |value: f32, (min, max): (f32, f32)| value.clamp(min, max);
        if let Some(stiffness) = update.stiffness {
            self.stiffness = clamp(stiffness, Self::STIFFNESS);
        }
        if let Some(damping) = update.damping {
            self.damping = clamp(damping, Self::DAMPING);
        }
        if let Some(mass) = update.mass {
            self.mass = clamp(mass, Self::MASS);
        }
        if let Some(duration) = update.duration {
            self.duration = clamp(duration, Self::DURATION);
        }
    }
}

impl CursorFollow {
    /// Merge a partial update.
    pub fn merge(&mut self, update: CursorFollowUpdate) {
        let CursorFollowUpdate {
            enabled,
            smoothing,
            max_angle,
            invert_x,
            invert_y,
            rotation_offset_x,
            rotation_offset_y,
        } = update;
        self.enabled = enabled.unwrap_or(self.enabled);
        self.smoothing = smoothing
            .map(|s| s.clamp(Self::MIN_SMOOTHING, 1.0))
            .unwrap_or(self.smoothing);
        self.max_angle = max_angle.unwrap_or(self.max_angle);
        self.invert_x = invert_x.unwrap_or(self.invert_x);
        self.invert_y = invert_y.unwrap_or(self.invert_y);
        self.rotation_offset_x = rotation_offset_x.unwrap_or(self.rotation_offset_x);
        self.rotation_offset_y = rotation_offset_y.unwrap_or(self.rotation_offset_y);
    }
}

/// Scene colors. Cosmetic only: nothing in the rotation or clipping math reads them.
#[derive(Debug, Clone, PartialEq, Resource, Reflect)]
#[reflect(Resource)]
pub struct ViewerColors {
    /// Clear color of the viewport.
    pub background: Srgba,
    /// Color of the model outline.
    pub outline_color: Srgba,
    /// Opacity of the model outline.
    pub outline_alpha: f32,
    /// Color of the clipping helper.
    pub clipping_box_color: Srgba,
    /// Opacity of the clipping helper.
    pub clipping_planes_opacity: f32,
    /// Intensity multiplier of the cursor light.
    pub light_intensity: f32,
    /// Lit color of the model.
    pub model_base_color: Srgba,
    /// Shaded color of the model.
    pub model_shade_color: Srgba,
}

impl Default for ViewerColors {
    fn default() -> Self {
        Self {
            background: Srgba::rgb_u8(0x8E, 0xF9, 0xF3),
            outline_color: Srgba::rgb_u8(0x4B, 0xC0, 0xD9),
            outline_alpha: 0.1,
            clipping_box_color: Srgba::rgb_u8(0x4B, 0xC0, 0xD9),
            clipping_planes_opacity: 1.0,
            light_intensity: 1.0,
            model_base_color: Srgba::rgb_u8(0xDC, 0xDC, 0x6A),
            model_shade_color: Srgba::rgb_u8(0xE5, 0xEC, 0xF4),
        }
    }
}

/// A partial update of [`ViewerColors`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorsUpdate {
    pub background: Option<Srgba>,
    pub outline_color: Option<Srgba>,
    pub outline_alpha: Option<f32>,
    pub clipping_box_color: Option<Srgba>,
    pub clipping_planes_opacity: Option<f32>,
    pub light_intensity: Option<f32>,
    pub model_base_color: Option<Srgba>,
    pub model_shade_color: Option<Srgba>,
}

impl ViewerColors {
    /// Merge a partial update.
    pub fn merge(&mut self, update: ColorsUpdate) {
        let ColorsUpdate {
            background,
            outline_color,
            outline_alpha,
            clipping_box_color,
            clipping_planes_opacity,
            light_intensity,
            model_base_color,
            model_shade_color,
        } = update;
        self.background = background.unwrap_or(self.background);
        self.outline_color = outline_color.unwrap_or(self.outline_color);
        self.outline_alpha = outline_alpha.unwrap_or(self.outline_alpha);
        self.clipping_box_color = clipping_box_color.unwrap_or(self.clipping_box_color);
        self.clipping_planes_opacity =
            clipping_planes_opacity.unwrap_or(self.clipping_planes_opacity);
        self.light_intensity = light_intensity.unwrap_or(self.light_intensity);
        self.model_base_color = model_base_color.unwrap_or(self.model_base_color);
        self.model_shade_color = model_shade_color.unwrap_or(self.model_shade_color);
    }
}
