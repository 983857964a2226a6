//! A single per-frame entry point for hosts that drive the viewer without the Bevy schedule.

use std::time::Duration;

use bevy_math::prelude::*;

use crate::{
    clipping::{helper::HelperGeometry, ClippingAnimator, PlanePair},
    controller::component::{ModelViewer, Orientation},
};

/// Everything the renderer needs to apply for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerFrame {
    /// Orientation of the model, `None` until the model is loaded.
    pub orientation: Option<Orientation>,
    /// Full model rotation including its rest roll, `None` until the model is loaded.
    pub rotation: Option<Quat>,
    /// Active clipping planes, `None` while clipping is disabled.
    pub planes: Option<PlanePair>,
    /// Rotation of the clipping helper.
    pub helper_rotation: Quat,
    /// Geometry the clipping helper currently presents.
    pub helper_geometry: Option<HelperGeometry>,
    /// Should the clipping helper be drawn?
    pub helper_visible: bool,
}

/// Advance the viewer and the clipping animation by one frame, in that order.
///
/// Rotation is resolved before the clipping animation, and both before the result is returned, so
/// the caller never observes a half-updated frame.
pub fn advance_frame(
    viewer: &mut ModelViewer,
    clipping: &mut ClippingAnimator,
    delta: Duration,
) -> ViewerFrame {
    let orientation = viewer.update(delta);
    let planes = clipping.update().copied();
    ViewerFrame {
        orientation,
        rotation: orientation.map(|_| viewer.rotation()),
        planes,
        helper_rotation: clipping.helper.rotation,
        helper_geometry: clipping.helper.presented().copied(),
        helper_visible: clipping.helper.visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clipping::helper::{HelperShape, HelperShapeUpdate},
        controller::pointer::RawPointerEvent,
    };

    #[test]
    fn frame_without_model_still_clips() {
        let mut viewer = ModelViewer::default().with_viewport(Vec2::new(640.0, 480.0));
        let mut clipping = ClippingAnimator::default();
        let frame = advance_frame(&mut viewer, &mut clipping, Duration::from_millis(16));
        assert!(frame.orientation.is_none());
        assert!(frame.rotation.is_none());
        assert!(frame.planes.is_some());
        assert!(frame.helper_visible);
    }

    #[test]
    fn frame_follows_shape_changes() {
        let mut viewer = ModelViewer::default();
        let mut clipping = ClippingAnimator::default();
        for _ in 0..100 {
            advance_frame(&mut viewer, &mut clipping, Duration::from_millis(16));
        }
        clipping.update_clipping_helper_shape(HelperShapeUpdate {
            shape: Some(HelperShape::Torus),
            ..Default::default()
        });
        let frame = advance_frame(&mut viewer, &mut clipping, Duration::from_millis(16));
        assert!(matches!(
            frame.helper_geometry,
            Some(HelperGeometry::Torus { .. })
        ));
    }

    #[test]
    fn frame_publishes_drag() {
        let mut viewer = ModelViewer::default().with_viewport(Vec2::new(640.0, 480.0));
        viewer.attach_model(Orientation::default(), 0.0);
        let mut clipping = ClippingAnimator::default();

        viewer.press_start(&RawPointerEvent::mouse(Vec2::new(320.0, 240.0)));
        viewer.press_move(&RawPointerEvent::mouse(Vec2::new(340.0, 240.0)));
        let frame = advance_frame(&mut viewer, &mut clipping, Duration::from_millis(16));
        let orientation = frame.orientation.unwrap_or_default();
        assert!(orientation.y > 0.0);
        assert_eq!(orientation.x, 0.0);
        assert_eq!(frame.rotation, Some(orientation.to_rotation(0.0)));
    }
}
