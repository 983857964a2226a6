//! A `bevy_elastic_viewer` extension that draws the clipping planes and the helper shape with
//! gizmos. Handy for tuning the clipping animation, or on targets where the helper mesh is not
//! rendered.

use bevy_app::prelude::*;
use bevy_color::{Alpha, Color};
use bevy_ecs::prelude::*;
use bevy_gizmos::prelude::*;
use bevy_math::{prelude::*, Isometry3d};
use bevy_reflect::prelude::*;
use bevy_transform::{prelude::*, TransformSystem};

use crate::{clipping::helper::HelperGeometry, prelude::*};

/// See the [module](self) docs.
pub struct ClipIndicatorPlugin;

impl Plugin for ClipIndicatorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            draw_clipping.after(TransformSystem::TransformPropagate),
        )
        .register_type::<ClipIndicator>();
    }
}

/// Optional. Configures whether or not a [`ModelViewer`] should show the clipping indicator. The
/// indicator will be enabled if this component is not present.
#[derive(Debug, Component, Reflect)]
pub struct ClipIndicator {
    /// Should the indicator be drawn around this viewer's model?
    pub enabled: bool,
    /// Side length of the squares drawn for each plane.
    pub plane_size: f32,
}

impl Default for ClipIndicator {
    fn default() -> Self {
        Self {
            enabled: true,
            plane_size: 4.0,
        }
    }
}

/// Use gizmos to draw the active clipping planes and the helper around each model.
pub fn draw_clipping(
    viewers: Query<(&GlobalTransform, Option<&ClipIndicator>), With<ModelViewer>>,
    clipping: Option<Res<ClippingAnimator>>,
    colors: Res<ViewerColors>,
    mut gizmos: Gizmos,
) {
    let Some(clipping) = clipping else {
        return;
    };
    let Some(planes) = clipping.active_planes() else {
        return;
    };
    let color = Color::from(
        colors
            .clipping_box_color
            .with_alpha(colors.clipping_planes_opacity),
    );

    for (transform, indicator) in viewers.iter() {
        let plane_size = match indicator {
            Some(indicator) if !indicator.enabled => continue,
            Some(indicator) => indicator.plane_size,
            None => ClipIndicator::default().plane_size,
        };
        let origin = transform.translation();

        for plane in [planes.a, planes.b] {
            let center = origin - plane.normal * plane.constant;
            let facing = Quat::from_rotation_arc(Vec3::Z, plane.normal);
            gizmos.rect(
                Isometry3d::new(center, facing),
                Vec2::splat(plane_size),
                color,
            );
            gizmos.arrow(center, center + plane.normal * 0.5, color);
        }

        if !clipping.helper.visible {
            continue;
        }
        let Some(geometry) = clipping.helper.presented() else {
            continue;
        };
        let isometry = Isometry3d::new(origin, clipping.helper.rotation * geometry.alignment());
        match *geometry {
            HelperGeometry::Sphere { radius } | HelperGeometry::UvSphere { radius, .. } => {
                gizmos.sphere(isometry, radius, color);
            }
            HelperGeometry::Torus {
                major_radius,
                minor_radius,
            } => {
                gizmos.primitive_3d(
                    &Torus {
                        minor_radius,
                        major_radius,
                    },
                    isometry,
                    color,
                );
            }
            HelperGeometry::Cone { radius, height } => {
                gizmos.primitive_3d(&Cone { radius, height }, isometry, color);
            }
        }
    }
}
