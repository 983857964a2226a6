//! Drag rotation, elastic rebound and idle cursor-follow of the displayed model.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;

use crate::ViewerSystems;

pub mod component;
pub mod drag;
pub mod events;
pub mod follow;
pub mod limits;
pub mod params;
pub mod pointer;
pub mod rebound;
pub mod tween;

/// Adds [`ModelViewer`](component::ModelViewer) functionality to the app.
pub struct ViewerControllerPlugin;

impl Plugin for ViewerControllerPlugin {
    fn build(&self, app: &mut App) {
        crate::configure_viewer_sets(app);
        app.add_event::<events::ViewerInput>()
            .add_event::<events::ModelLoaded>()
            .add_event::<events::ModelLoadFailed>()
            .add_event::<events::ViewerSettings>()
            .init_resource::<params::ViewerColors>()
            .add_systems(
                Update,
                (
                    (
                        events::ModelLoaded::receive,
                        events::ModelLoadFailed::receive,
                        events::ViewerSettings::receive,
                    )
                        .in_set(ViewerSystems::Settings),
                    component::ModelViewer::receive_inputs.in_set(ViewerSystems::Input),
                    component::ModelViewer::update_viewers.in_set(ViewerSystems::Rotation),
                ),
            )
            .register_type::<component::ModelViewer>()
            .register_type::<params::ViewerColors>();
    }
}
