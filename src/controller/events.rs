//! Events for feeding input, model loading and settings changes into the viewer.

use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_transform::prelude::*;

use crate::clipping::{helper::HelperShapeUpdate, ClippingAnimator};

use super::{
    component::{ModelViewer, Orientation},
    params::{
        ColorsUpdate, CursorFollowUpdate, ElasticPhysicsUpdate, RotationLimitsUpdate,
        ViewerColors,
    },
    pointer::RawPointerEvent,
};

/// Pointer and viewport input for every [`ModelViewer`].
///
/// Sent by the [`ViewerInputPlugin`](crate::input::ViewerInputPlugin), or by hand when the host
/// has its own input handling.
#[derive(Debug, Clone, PartialEq, Event)]
pub enum ViewerInput {
    /// A pointer went down on the viewport.
    Pressed(RawPointerEvent),
    /// A pointer moved.
    Moved(RawPointerEvent),
    /// The pointer was released or the touch was cancelled.
    Released,
    /// The viewport was resized to this logical size.
    Resized(Vec2),
}

/// Send this event once the model under a [`ModelViewer`] is loaded. The rest orientation is taken
/// from the entity's [`Transform`] at that moment.
#[derive(Debug, Clone, Copy, Event)]
pub struct ModelLoaded {
    /// The entity holding the [`ModelViewer`].
    pub viewer: Entity,
}

/// Send this event when the model under a [`ModelViewer`] failed to load. The failure is logged
/// and the viewer stays without a model, ignoring drag and idle input.
#[derive(Debug, Clone, Event)]
pub struct ModelLoadFailed {
    /// The entity holding the [`ModelViewer`].
    pub viewer: Entity,
    /// Human readable cause.
    pub reason: String,
}

impl ModelLoaded {
    pub(crate) fn receive(
        mut events: EventReader<Self>,
        mut viewers: Query<(&mut ModelViewer, &Transform)>,
    ) {
        for event in events.read() {
            let Ok((mut viewer, transform)) = viewers.get_mut(event.viewer) else {
                warn!("Model loaded for {}, which has no ModelViewer", event.viewer);
                continue;
            };
            let (initial, roll) = Orientation::from_rotation(transform.rotation);
            debug!("Model attached to {} at rest orientation {initial:?}", event.viewer);
            viewer.attach_model(initial, roll);
        }
    }
}

impl ModelLoadFailed {
    pub(crate) fn receive(mut events: EventReader<Self>) {
        for event in events.read() {
            error!(
                "An error happened while loading the model for {}: {}",
                event.viewer, event.reason
            );
        }
    }
}

/// Runtime settings changes. Each variant is merged shallowly into the current settings of every
/// viewer, or into the scene-wide clipping and color resources.
#[derive(Debug, Clone, PartialEq, Event)]
pub enum ViewerSettings {
    /// See [`ModelViewer::update_rotation_limits`].
    RotationLimits(RotationLimitsUpdate),
    /// See [`ModelViewer::update_elastic_physics`].
    ElasticPhysics(ElasticPhysicsUpdate),
    /// See [`ModelViewer::update_cursor_follow`].
    CursorFollow(CursorFollowUpdate),
    /// See [`ClippingAnimator::update_clipping_helper_shape`].
    ClippingHelperShape(HelperShapeUpdate),
    /// Turn the clipping planes on or off.
    ClippingEnabled(bool),
    /// See [`ViewerColors::merge`].
    Colors(ColorsUpdate),
}

impl ViewerSettings {
    pub(crate) fn receive(
        mut events: EventReader<Self>,
        mut viewers: Query<&mut ModelViewer>,
        mut clipping: Option<ResMut<ClippingAnimator>>,
        mut colors: Option<ResMut<ViewerColors>>,
    ) {
        for event in events.read() {
            match event {
                ViewerSettings::RotationLimits(update) => viewers
                    .iter_mut()
                    .for_each(|mut viewer| viewer.update_rotation_limits(*update)),
                ViewerSettings::ElasticPhysics(update) => viewers
                    .iter_mut()
                    .for_each(|mut viewer| viewer.update_elastic_physics(*update)),
                ViewerSettings::CursorFollow(update) => viewers
                    .iter_mut()
                    .for_each(|mut viewer| viewer.update_cursor_follow(*update)),
                ViewerSettings::ClippingHelperShape(update) => match clipping.as_mut() {
                    Some(clipping) => {
                        clipping.update_clipping_helper_shape(*update);
                    }
                    None => warn_once!("Clipping settings sent without a ClippingPlugin"),
                },
                ViewerSettings::ClippingEnabled(enabled) => match clipping.as_mut() {
                    Some(clipping) => clipping.enabled = *enabled,
                    None => warn_once!("Clipping settings sent without a ClippingPlugin"),
                },
                ViewerSettings::Colors(update) => match colors.as_mut() {
                    Some(colors) => colors.merge(*update),
                    None => warn_once!("Color settings sent without ViewerColors"),
                },
            }
        }
    }
}
