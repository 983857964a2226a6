//! A `bevy_elastic_viewer` extension that makes a light drift toward the pointer, so the shading of
//! the model reacts to the cursor even while the model itself is held still.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_transform::prelude::*;

use crate::{prelude::*, ViewerSystems};

/// See the [module](self) docs.
pub struct CursorLightPlugin;

impl Plugin for CursorLightPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            CursorLight::follow_pointer.in_set(ViewerSystems::Publish),
        )
        .register_type::<CursorLight>();

        #[cfg(feature = "bevy_pbr")]
        app.add_systems(
            Update,
            CursorLight::apply_intensity.in_set(ViewerSystems::Publish),
        );
    }
}

/// Add to a light entity to make it follow the pointer of a [`ModelViewer`].
#[derive(Debug, Clone, Component, Reflect)]
pub struct CursorLight {
    /// The viewer whose pointer is followed.
    pub viewer: Entity,
    /// Light position (x, y) when the pointer is in a corner of the viewport.
    pub range: Vec2,
    /// Fraction of the remaining distance covered each frame.
    pub smoothing: f32,
    /// Illuminance before [`ViewerColors::light_intensity`] is applied.
    pub illuminance: f32,
}

impl CursorLight {
    /// Follow the pointer of `viewer` with the default range and smoothing.
    pub fn new(viewer: Entity) -> Self {
        Self {
            viewer,
            range: Vec2::new(15.0, 5.0),
            smoothing: 0.1,
            illuminance: 10_000.0,
        }
    }

    /// The light position (x, y) for a pointer at `from_center`.
    pub fn target(&self, from_center: Vec2) -> Vec2 {
        from_center * self.range
    }

    fn follow_pointer(
        mut lights: Query<(&CursorLight, &mut Transform)>,
        viewers: Query<&ModelViewer>,
    ) {
        for (light, mut transform) in lights.iter_mut() {
            let Ok(viewer) = viewers.get(light.viewer) else {
                continue;
            };
            let target = light.target(viewer.pointer.position_from_center);
            let current = transform.translation.truncate();
            let next = current.lerp(target, light.smoothing);
            transform.translation.x = next.x;
            transform.translation.y = next.y;
        }
    }

    #[cfg(feature = "bevy_pbr")]
    fn apply_intensity(
        mut lights: Query<(&CursorLight, &mut bevy_pbr::DirectionalLight)>,
        colors: Res<ViewerColors>,
    ) {
        if !colors.is_changed() {
            return;
        }
        for (light, mut directional) in lights.iter_mut() {
            directional.illuminance = light.illuminance * colors.light_intensity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_scales_with_pointer() {
        let light = CursorLight::new(Entity::PLACEHOLDER);
        assert_eq!(light.target(Vec2::new(1.0, -1.0)), Vec2::new(15.0, -5.0));
        assert_eq!(light.target(Vec2::ZERO), Vec2::ZERO);
    }
}
