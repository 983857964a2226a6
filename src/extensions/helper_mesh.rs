//! A `bevy_elastic_viewer` extension that renders the clipping helper as a translucent mesh, and
//! applies the scene colors of [`ViewerColors`] to it and to the [`ClearColor`].
//!
//! Each rebuild of the helper is presented here: the staged geometry is meshed, swapped in through
//! [`ClippingHelper::complete_swap`](crate::clipping::helper::ClippingHelper::complete_swap), and
//! the mesh it replaces is removed from [`Assets<Mesh>`] in the same frame.
//!
//! Wireframe drawing uses [`Wireframe`], which is only rendered when the app has a
//! [`WireframePlugin`](bevy_pbr::wireframe::WireframePlugin).

use bevy_app::prelude::*;
use bevy_asset::prelude::*;
use bevy_color::{Alpha, Color};
use bevy_ecs::{name::Name, prelude::*};
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_pbr::{prelude::*, wireframe::Wireframe};
use bevy_reflect::prelude::*;
use bevy_render::{
    alpha::AlphaMode,
    camera::ClearColor,
    mesh::{Mesh, Mesh3d, MeshBuilder, Meshable},
    view::Visibility,
};
use bevy_transform::prelude::*;

use crate::{clipping::helper::HelperGeometry, prelude::*, ViewerSystems};

/// See the [module](self) docs.
pub struct HelperMeshPlugin;

impl Plugin for HelperMeshPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, ClippingHelperMesh::spawn)
            .add_systems(
                Update,
                (
                    ClippingHelperMesh::present,
                    ClippingHelperMesh::apply_colors,
                )
                    .in_set(ViewerSystems::Publish),
            )
            .register_type::<ClippingHelperMesh>();
    }
}

/// Marks the entity that displays the clipping helper and holds the mesh currently presented.
#[derive(Debug, Default, Component, Reflect)]
#[require(Transform, Visibility)]
pub struct ClippingHelperMesh {
    mesh: Option<Handle<Mesh>>,
}

impl ClippingHelperMesh {
    /// The mesh currently presented, if any.
    pub fn mesh(&self) -> Option<&Handle<Mesh>> {
        self.mesh.as_ref()
    }

    fn spawn(
        mut commands: Commands,
        mut materials: ResMut<Assets<StandardMaterial>>,
        colors: Option<Res<ViewerColors>>,
        clipping: Option<ResMut<ClippingAnimator>>,
    ) {
        match clipping {
            Some(mut clipping) => clipping.helper.register_presenter(),
            None => warn!("HelperMeshPlugin added without a ClippingPlugin, no helper to present"),
        }
        let colors = colors.map(|colors| colors.clone()).unwrap_or_default();
        commands.spawn((
            Name::new("Clipping Helper"),
            ClippingHelperMesh::default(),
            MeshMaterial3d(materials.add(helper_material(&colors))),
        ));
    }

    fn present(
        mut commands: Commands,
        clipping: Option<ResMut<ClippingAnimator>>,
        mut helpers: Query<(
            Entity,
            &mut ClippingHelperMesh,
            &mut Transform,
            &mut Visibility,
            Has<Wireframe>,
        )>,
        mut meshes: ResMut<Assets<Mesh>>,
    ) {
        let Some(mut clipping) = clipping else {
            return;
        };
        let Ok((entity, mut helper, mut transform, mut visibility, has_wireframe)) =
            helpers.single_mut()
        else {
            warn_once!("Expected exactly one ClippingHelperMesh, the helper will not be presented");
            return;
        };

        if let Some(geometry) = clipping.helper.staged().copied() {
            let handle = meshes.add(build_mesh(&geometry));
            match clipping.helper.complete_swap(&mut helper.mesh, handle.clone()) {
                Ok(previous) => {
                    if let Some(previous) = previous {
                        meshes.remove(&previous);
                    }
                    debug!("Clipping helper swapped to {geometry:?}");
                    commands.entity(entity).insert(Mesh3d(handle));
                }
                Err(stale) => {
                    meshes.remove(&stale);
                }
            }
        }

        let wireframe = clipping.helper.config().wireframe;
        if wireframe && !has_wireframe {
            commands.entity(entity).insert(Wireframe);
        } else if !wireframe && has_wireframe {
            commands.entity(entity).remove::<Wireframe>();
        }

        let alignment = clipping
            .helper
            .presented()
            .map(HelperGeometry::alignment)
            .unwrap_or(Quat::IDENTITY);
        transform.rotation = clipping.helper.rotation * alignment;
        visibility.set_if_neq(if clipping.helper.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
    }

    fn apply_colors(
        colors: Res<ViewerColors>,
        helpers: Query<&MeshMaterial3d<StandardMaterial>, With<ClippingHelperMesh>>,
        mut materials: ResMut<Assets<StandardMaterial>>,
        clear_color: Option<ResMut<ClearColor>>,
    ) {
        if !colors.is_changed() {
            return;
        }
        if let Some(mut clear_color) = clear_color {
            clear_color.0 = Color::from(colors.background);
        }
        for material in helpers.iter() {
            if let Some(material) = materials.get_mut(&material.0) {
                *material = helper_material(&colors);
            }
        }
    }
}

fn helper_material(colors: &ViewerColors) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::from(
            colors
                .clipping_box_color
                .with_alpha(colors.clipping_planes_opacity),
        ),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..Default::default()
    }
}

/// Mesh the helper geometry in its native primitive frame, see [`HelperGeometry::alignment`].
pub fn build_mesh(geometry: &HelperGeometry) -> Mesh {
    match *geometry {
        HelperGeometry::Sphere { radius } => Sphere::new(radius).mesh().uv(32, 16),
        HelperGeometry::Torus {
            major_radius,
            minor_radius,
        } => Torus {
            minor_radius,
            major_radius,
        }
        .mesh()
        .minor_resolution(16)
        .major_resolution(32)
        .build(),
        HelperGeometry::Cone { radius, height } => {
            Cone { radius, height }.mesh().resolution(32).build()
        }
        HelperGeometry::UvSphere {
            radius,
            sectors,
            stacks,
        } => Sphere::new(radius).mesh().uv(sectors, stacks),
    }
}
