//! A model viewer controller for Bevy: drag to rotate a model against soft limits, release to let it
//! spring back to rest, or leave the pointer idle and the model subtly tracks the cursor. Meanwhile a
//! pair of opposing clipping planes sweeps through the model, exposing a moving cross-section.
//!
//! Add [`DefaultViewerPlugins`], spawn the model with a [`ModelViewer`](prelude::ModelViewer), and
//! send [`ModelLoaded`](prelude::ModelLoaded) once the model's rest orientation is known.
//!
//! The rotation and clipping state is pure: [`ModelViewer`](prelude::ModelViewer) and
//! [`ClippingAnimator`](prelude::ClippingAnimator) only produce values, which the systems in this
//! crate (or your own host, see [`frame::advance_frame`]) apply to the scene.

use bevy_app::{prelude::*, PluginGroupBuilder};
use bevy_ecs::prelude::*;

pub mod clipping;
pub mod controller;
pub mod extensions;
pub mod frame;
pub mod input;

/// Commonly used types and traits.
pub mod prelude {
    pub use crate::{
        clipping::{
            helper::{ClippingHelperConfig, HelperShape, HelperShapeUpdate},
            ClipPlane, ClippingAnimator, ClippingPlugin, PlanePair,
        },
        controller::{
            component::{ModelViewer, Orientation, RotationMotion},
            events::{ModelLoadFailed, ModelLoaded, ViewerInput, ViewerSettings},
            limits::{AxisLimits, RotationLimits},
            params::{
                AxisLimitsUpdate, ColorsUpdate, CursorFollowUpdate, ElasticPhysicsUpdate,
                RotationLimitsUpdate, ViewerColors, ViewerParams,
            },
            pointer::RawPointerEvent,
            ViewerControllerPlugin,
        },
        input::ViewerInputPlugin,
        DefaultViewerPlugins, ViewerSystems,
    };
}

/// Adds input handling, the viewer controller, the clipping animation and all enabled extensions.
pub struct DefaultViewerPlugins;

impl PluginGroup for DefaultViewerPlugins {
    #[allow(clippy::let_and_return)]
    fn build(self) -> PluginGroupBuilder {
        let group = PluginGroupBuilder::start::<Self>()
            .add(input::ViewerInputPlugin)
            .add(controller::ViewerControllerPlugin)
            .add(clipping::ClippingPlugin)
            .add(extensions::cursor_light::CursorLightPlugin);

        #[cfg(feature = "extension_clip_indicator")]
        let group = group.add(extensions::clip_indicator::ClipIndicatorPlugin);

        #[cfg(feature = "extension_helper_mesh")]
        let group = group.add(extensions::helper_mesh::HelperMeshPlugin);

        group
    }
}

/// The stages of a viewer frame, run in this order in [`Update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum ViewerSystems {
    /// Model loading and settings changes are applied.
    Settings,
    /// Pointer and viewport input is applied to the viewers.
    Input,
    /// Viewers advance their rebound or idle blend and write their transforms.
    Rotation,
    /// The clipping animation advances.
    Clipping,
    /// Results are presented: helper mesh, gizmos, lights.
    Publish,
}

pub(crate) fn configure_viewer_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            ViewerSystems::Settings,
            ViewerSystems::Input,
            ViewerSystems::Rotation,
            ViewerSystems::Clipping,
            ViewerSystems::Publish,
        )
            .chain(),
    );
}
