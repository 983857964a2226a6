//! The primary [`Component`] of the controller, [`ModelViewer`].

use std::time::Duration;

use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::{prelude::*, EulerRot};
use bevy_reflect::prelude::*;
use bevy_time::prelude::*;
use bevy_transform::prelude::*;

use super::{
    drag::DragState,
    events::ViewerInput,
    follow::IdleBlend,
    params::{CursorFollowUpdate, ElasticPhysicsUpdate, RotationLimitsUpdate, ViewerParams},
    pointer::{PointerSignal, RawPointerEvent},
    rebound::Rebound,
};

/// A model orientation: tilt about X and turn about Y, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct Orientation {
    /// Tilt about the X axis.
    pub x: f32,
    /// Turn about the Y axis.
    pub y: f32,
}

impl Orientation {
    /// Construct an orientation from radians.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Split a rotation into an orientation and the remaining roll about Z, using `XYZ` order.
    pub fn from_rotation(rotation: Quat) -> (Self, f32) {
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        (Self { x, y }, z)
    }

    /// The rotation of this orientation with the given `roll` about Z, using `XYZ` order.
    pub fn to_rotation(self, roll: f32) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.x, self.y, roll)
    }
}

impl From<Vec2> for Orientation {
    fn from(value: Vec2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Orientation> for Vec2 {
    fn from(value: Orientation) -> Self {
        Vec2::new(value.x, value.y)
    }
}

/// What is driving the model orientation right now.
#[derive(Debug, Clone, Default, Reflect)]
pub enum RotationMotion {
    /// The idle blend owns the orientation, if cursor-follow is enabled.
    #[default]
    Idle,
    /// The user is dragging the model.
    Dragging(DragState),
    /// The model is springing back to its rest orientation.
    Rebounding {
        /// The tween moving the model.
        rebound: Rebound,
        /// Overshoot ratios recorded at release. Cleared with the rebound.
        beyond: Vec2,
    },
}

/// Tracks all state of a model viewer: pointer, drag, rebound and idle blend, plus its settings.
///
/// Place this on the root entity of the displayed model. Until the model is loaded and
/// [`ModelViewer::attach_model`] is called (see [`ModelLoaded`](super::events::ModelLoaded)), every
/// rotation operation is a no-op.
///
/// # Moving the model
///
/// The [`ViewerInputPlugin`](crate::input::ViewerInputPlugin) feeds window and touch input in
/// automatically. To drive the viewer manually:
///
/// 1. Call [`ModelViewer::press_start`] when a pointer goes down.
/// 2. Call [`ModelViewer::press_move`] as it moves.
/// 3. Call [`ModelViewer::press_end`] when it is released. The model springs back to rest.
/// 4. Call [`ModelViewer::update`] once per frame and apply the returned orientation.
#[derive(Debug, Clone, Component, Reflect)]
pub struct ModelViewer {
    /// Limits, rebound and cursor-follow settings.
    pub params: ViewerParams,
    /// The pointer as seen by this viewer. Owned per viewer, never shared.
    pub pointer: PointerSignal,
    /// Current rotation driver. Managed by the viewer, exposed for inspection.
    pub motion: RotationMotion,
    initial: Option<Orientation>,
    roll: f32,
    current: Orientation,
    blend: IdleBlend,
}

impl Default for ModelViewer {
    fn default() -> Self {
        Self::new(ViewerParams::default())
    }
}

impl ModelViewer {
    /// Create a viewer with the given parameters.
    pub fn new(params: ViewerParams) -> Self {
        Self {
            params,
            pointer: PointerSignal::default(),
            motion: RotationMotion::Idle,
            initial: None,
            roll: 0.0,
            current: Orientation::default(),
            blend: IdleBlend {
                target: Vec2::ZERO,
            },
        }
    }

    /// Set the viewport size the pointer is normalized against.
    pub fn with_viewport(mut self, viewport: Vec2) -> Self {
        self.pointer = PointerSignal::new(viewport);
        self
    }

    /// Provide the model's rest orientation once the model is available. Only the first call takes
    /// effect: the rest orientation never changes afterwards.
    pub fn attach_model(&mut self, initial: Orientation, roll: f32) {
        if self.initial.is_some() {
            debug!("Model already attached, keeping the original rest orientation");
            return;
        }
        self.initial = Some(initial);
        self.roll = roll;
        self.current = initial;
        self.blend.target = initial.into();
    }

    /// Is a model attached?
    pub fn has_model(&self) -> bool {
        self.initial.is_some()
    }

    /// The rest orientation, if a model is attached.
    pub fn initial(&self) -> Option<Orientation> {
        self.initial
    }

    /// The orientation applied to the model.
    pub fn orientation(&self) -> Orientation {
        self.current
    }

    /// The destination of the idle blend.
    pub fn target(&self) -> Orientation {
        self.blend.target.into()
    }

    /// The rotation to apply to the model transform, including the rest roll about Z.
    pub fn rotation(&self) -> Quat {
        self.current.to_rotation(self.roll)
    }

    /// Is the model being dragged?
    pub fn is_dragging(&self) -> bool {
        matches!(self.motion, RotationMotion::Dragging(_))
    }

    /// Is the model springing back to rest?
    pub fn is_rebounding(&self) -> bool {
        matches!(self.motion, RotationMotion::Rebounding { .. })
    }

    /// Overshoot ratio per axis past the progressive zone. Zero outside of a drag or rebound.
    pub fn beyond_limit(&self) -> Vec2 {
        match &self.motion {
            RotationMotion::Idle => Vec2::ZERO,
            RotationMotion::Dragging(drag) => drag.beyond,
            RotationMotion::Rebounding { beyond, .. } => *beyond,
        }
    }

    /// A pointer went down. Updates the pointer signal and starts a drag if idle or rebounding,
    /// cancelling the rebound.
    pub fn press_start(&mut self, event: &RawPointerEvent) {
        self.pointer.on_event(event);
        if self.initial.is_none() || event.is_multi_touch() || self.is_dragging() {
            return;
        }
        if self.is_rebounding() {
            debug!("Rebound cancelled by a new drag");
        }
        self.motion = RotationMotion::Dragging(DragState::new(event.point(), self.current.into()));
    }

    /// A pointer moved. Updates the pointer signal and, while dragging, the orientation.
    pub fn press_move(&mut self, event: &RawPointerEvent) {
        self.pointer.on_event(event);
        if event.is_multi_touch() {
            return;
        }
        let viewport = self.pointer.viewport();
        let limits = self.params.rotation_limits;
        if let RotationMotion::Dragging(ref mut drag) = self.motion {
            let rotation = drag.drag_to(event.point(), viewport, &limits);
            trace!("Drag raw {:?} applied {:?}", rotation.raw, rotation.applied);
            self.current = rotation.applied.into();
        }
    }

    /// A pointer was released. Ends the drag and starts the rebound toward rest.
    pub fn press_end(&mut self) {
        let (RotationMotion::Dragging(drag), Some(initial)) = (&self.motion, self.initial) else {
            return;
        };
        let beyond = drag.beyond;
        let rebound = Rebound::plan(
            self.current.into(),
            initial.into(),
            beyond,
            &self.params.rotation_limits,
            &self.params.elastic_physics,
        );
        debug!(
            "Rebound from {:?} over {:?} with {:?}",
            self.current,
            rebound.duration(),
            rebound.easing()
        );
        self.motion = RotationMotion::Rebounding { rebound, beyond };
    }

    /// The viewport was resized.
    pub fn resize(&mut self, viewport: Vec2) {
        self.pointer.resize(viewport);
    }

    /// Advance one frame. Returns the orientation to apply, or `None` while there is no model.
    ///
    /// Drag input is applied as it arrives, so this only advances the rebound, or the idle blend
    /// when nothing else drives the model.
    pub fn update(&mut self, delta: Duration) -> Option<Orientation> {
        self.pointer.update_frame();
        let initial = self.initial?;

        match self.motion {
            RotationMotion::Dragging(_) => {}
            RotationMotion::Rebounding {
                ref mut rebound, ..
            } => {
                self.current = rebound.advance(delta).into();
                if rebound.is_finished() {
                    debug!("Rebound finished");
                    self.motion = RotationMotion::Idle;
                }
            }
            RotationMotion::Idle => {
                let follow = self.params.cursor_follow;
                if follow.enabled {
                    let target = follow.target(
                        initial.into(),
                        self.pointer.position_from_center,
                        &self.params.rotation_limits,
                    );
                    self.current = self
                        .blend
                        .step(self.current.into(), target, follow.smoothing)
                        .into();
                }
            }
        }
        Some(self.current)
    }

    /// Merge new rotation limits.
    pub fn update_rotation_limits(&mut self, update: RotationLimitsUpdate) {
        self.params.rotation_limits.merge(update);
    }

    /// Merge new rebound settings. Each field is clamped to its valid range.
    pub fn update_elastic_physics(&mut self, update: ElasticPhysicsUpdate) {
        self.params.elastic_physics.merge(update);
    }

    /// Merge new cursor-follow settings.
    pub fn update_cursor_follow(&mut self, update: CursorFollowUpdate) {
        self.params.cursor_follow.merge(update);
    }

    /// Apply [`ViewerInput`] events to every viewer.
    pub fn receive_inputs(mut inputs: EventReader<ViewerInput>, mut viewers: Query<&mut Self>) {
        for input in inputs.read() {
            for mut viewer in viewers.iter_mut() {
                match input {
                    ViewerInput::Pressed(event) => viewer.press_start(event),
                    ViewerInput::Moved(event) => viewer.press_move(event),
                    ViewerInput::Released => viewer.press_end(),
                    ViewerInput::Resized(size) => viewer.resize(*size),
                }
            }
        }
    }

    /// Advance every viewer and write the result to its [`Transform`]. Called once per frame.
    pub fn update_viewers(mut viewers: Query<(&mut Self, &mut Transform)>, time: Res<Time>) {
        for (mut viewer, mut transform) in viewers.iter_mut() {
            if viewer.update(time.delta()).is_some() {
                transform.rotation = viewer.rotation();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{params::AxisLimitsUpdate, tween::Easing};

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);
    const FRAME: Duration = Duration::from_millis(16);

    fn loaded() -> ModelViewer {
        let mut viewer = ModelViewer::default().with_viewport(VIEWPORT);
        viewer.attach_model(Orientation::default(), 0.0);
        viewer
    }

    fn mouse(x: f32, y: f32) -> RawPointerEvent {
        RawPointerEvent::mouse(Vec2::new(x, y))
    }

    #[test]
    fn no_model_is_a_no_op() {
        let mut viewer = ModelViewer::default().with_viewport(VIEWPORT);
        viewer.press_start(&mouse(400.0, 300.0));
        viewer.press_move(&mouse(600.0, 500.0));
        viewer.press_end();
        assert!(!viewer.is_dragging());
        assert!(viewer.update(FRAME).is_none());
        assert_eq!(viewer.orientation(), Orientation::default());
    }

    #[test]
    fn rest_orientation_is_set_once() {
        let mut viewer = loaded();
        viewer.attach_model(Orientation::new(1.0, 1.0), 0.5);
        assert_eq!(viewer.initial(), Some(Orientation::default()));
    }

    #[test]
    fn drag_release_rebound_cycle() {
        let mut viewer = loaded();
        viewer.press_start(&mouse(400.0, 300.0));
        assert!(viewer.is_dragging());

        // Far past the limits on both axes.
        viewer.press_move(&mouse(800.0, 600.0));
        let dragged = viewer.orientation();
        assert!(dragged.x > 0.0 && dragged.y > 0.0);
        assert!(viewer.beyond_limit().x > 0.0 && viewer.beyond_limit().y > 0.0);

        // Dragging is not blended.
        viewer.update(FRAME);
        assert_eq!(viewer.orientation(), dragged);

        viewer.press_end();
        assert!(viewer.is_rebounding());
        assert!(viewer.beyond_limit().x > 0.0);

        let mut frames = 0;
        while viewer.is_rebounding() {
            viewer.update(FRAME);
            frames += 1;
            assert!(frames < 10_000);
        }
        let rest = viewer.orientation();
        assert!(rest.x.abs() < 1e-6 && rest.y.abs() < 1e-6);
        assert_eq!(viewer.beyond_limit(), Vec2::ZERO);
    }

    #[test]
    fn wide_limits_rebound_with_full_overshoot() {
        let mut viewer = ModelViewer::default().with_viewport(VIEWPORT);
        viewer.update_rotation_limits(RotationLimitsUpdate {
            y: Some(AxisLimitsUpdate {
                min: Some(-90.0),
                max: Some(90.0),
            }),
            ..Default::default()
        });
        viewer.attach_model(Orientation::default(), 0.0);

        viewer.press_start(&mouse(400.0, 300.0));
        viewer.press_move(&mouse(800.0, 300.0));
        assert!((viewer.beyond_limit().y - 144.0 / 54.0).abs() < 1e-4);

        viewer.press_end();
        let RotationMotion::Rebounding { ref rebound, .. } = viewer.motion else {
            panic!("release must start a rebound");
        };
        let Easing::ElasticOut { amplitude, period } = rebound.easing() else {
            panic!("rebound must be elastic");
        };
        assert!((amplitude - 1.04).abs() < 1e-5);
        assert!((period - 0.18).abs() < 1e-5);
    }

    #[test]
    fn new_press_halts_rebound() {
        let mut viewer = loaded();
        viewer.press_start(&mouse(400.0, 300.0));
        viewer.press_move(&mouse(500.0, 350.0));
        viewer.press_end();
        viewer.update(FRAME);
        viewer.update(FRAME);

        viewer.press_start(&mouse(400.0, 300.0));
        let held = viewer.orientation();
        assert!(viewer.is_dragging());
        for _ in 0..30 {
            viewer.update(FRAME);
            assert_eq!(viewer.orientation(), held);
        }
        assert_eq!(viewer.beyond_limit(), Vec2::ZERO);
    }

    #[test]
    fn press_updates_pointer_without_model() {
        let mut viewer = ModelViewer::default().with_viewport(VIEWPORT);
        viewer.press_start(&RawPointerEvent::touch([Vec2::new(200.0, 150.0)]));
        assert_eq!(viewer.pointer.position, Vec2::new(200.0, 150.0));
        assert_eq!(viewer.pointer.position_from_center, Vec2::new(-0.5, 0.5));
        assert!(viewer.pointer.moved);
        assert!(!viewer.is_dragging());
    }

    #[test]
    fn multi_touch_is_ignored() {
        let mut viewer = loaded();
        let two_fingers = RawPointerEvent::touch([Vec2::new(100.0, 100.0), Vec2::new(200.0, 200.0)]);
        viewer.press_start(&two_fingers);
        assert!(!viewer.is_dragging());

        viewer.press_start(&RawPointerEvent::touch([Vec2::new(400.0, 300.0)]));
        viewer.press_move(&RawPointerEvent::touch([
            Vec2::new(700.0, 300.0),
            Vec2::new(10.0, 10.0),
        ]));
        assert_eq!(viewer.orientation(), Orientation::default());
        assert!(viewer.is_dragging());
    }

    #[test]
    fn idle_blend_follows_cursor_within_limits() {
        let mut viewer = loaded();
        viewer.press_move(&mouse(800.0, 0.0));
        let limits = viewer.params.rotation_limits;
        for _ in 0..500 {
            let current = viewer.update(FRAME).unwrap_or_default();
            assert!(current.x <= limits.x.max_radians() + 1e-6);
            assert!(current.y <= limits.y.max_radians() + 1e-6);
        }
        let target = viewer.target();
        assert!((viewer.orientation().x - target.x).abs() < 1e-4);
        assert!((target.x - 25f32.to_radians()).abs() < 1e-5);
        assert!((target.y - 25f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn disabled_follow_holds() {
        let mut viewer = loaded();
        viewer.update_cursor_follow(CursorFollowUpdate {
            enabled: Some(false),
            ..Default::default()
        });
        viewer.press_move(&mouse(0.0, 0.0));
        for _ in 0..10 {
            viewer.update(FRAME);
        }
        assert_eq!(viewer.orientation(), Orientation::default());
    }

    #[test]
    fn rotation_round_trips_roll() {
        let rotation = Orientation::new(0.2, -0.3).to_rotation(0.1);
        let (orientation, roll) = Orientation::from_rotation(rotation);
        assert!((orientation.x - 0.2).abs() < 1e-5);
        assert!((orientation.y + 0.3).abs() < 1e-5);
        assert!((roll - 0.1).abs() < 1e-5);
    }
}
