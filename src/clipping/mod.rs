//! A pair of opposing clipping planes sweeping through the model on a procedural path.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

use crate::ViewerSystems;

use self::helper::{ClippingHelper, ClippingHelperConfig, HelperShapeUpdate, Rebuild};

pub mod helper;

/// Adds the [`ClippingAnimator`] resource and advances it once per frame.
pub struct ClippingPlugin;

impl Plugin for ClippingPlugin {
    fn build(&self, app: &mut App) {
        crate::configure_viewer_sets(app);
        app.init_resource::<ClippingAnimator>()
            .add_systems(
                Update,
                ClippingAnimator::update_planes.in_set(ViewerSystems::Clipping),
            )
            .register_type::<ClippingAnimator>();
    }
}

/// A half-space boundary: points `p` with `normal · p + constant >= 0` are kept.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ClipPlane {
    /// Unit normal of the plane.
    pub normal: Vec3,
    /// Signed offset along the normal.
    pub constant: f32,
}

impl ClipPlane {
    /// Signed distance from the plane to `point`. Points with a negative distance are clipped.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }
}

/// Two planes facing opposite ways at the same depth. Together they keep a slab of the model
/// around the origin and clip away everything else.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PlanePair {
    /// The plane facing along the animated direction.
    pub a: ClipPlane,
    /// The plane facing against the animated direction.
    pub b: ClipPlane,
}

impl PlanePair {
    /// A pair facing `direction`, normalized here, both at `constant`.
    pub fn new(direction: Vec3, constant: f32) -> Self {
        let normal = direction.normalize_or(Vec3::X);
        Self {
            a: ClipPlane { normal, constant },
            b: ClipPlane {
                normal: -normal,
                constant,
            },
        }
    }

    /// Is `point` kept by both planes?
    pub fn contains(&self, point: Vec3) -> bool {
        self.a.distance_to_point(point) >= 0.0 && self.b.distance_to_point(point) >= 0.0
    }
}

/// Frequencies and phases of the per-axis sinusoids that steer the plane direction.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ClippingAnimation {
    pub speed_x: f32,
    pub speed_y: f32,
    pub speed_z: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub offset_z: f32,
}

impl Default for ClippingAnimation {
    fn default() -> Self {
        Self {
            speed_x: 1.2,
            speed_y: 1.3,
            speed_z: 1.3,
            offset_x: 0.0,
            offset_y: -1.0,
            offset_z: 2.0,
        }
    }
}

impl ClippingAnimation {
    /// The unit plane direction at time `t`.
    pub fn direction(&self, t: f32) -> Vec3 {
        Vec3::new(
            (self.speed_x * t + self.offset_x).sin(),
            (self.speed_y * t + self.offset_y).sin(),
            (self.speed_z * t + self.offset_z).cos(),
        )
        .normalize_or(Vec3::X)
    }
}

/// Animates the clipping plane pair and orients the helper that visualizes it.
///
/// The renderer reads [`ClippingAnimator::active_planes`] each frame and never writes to it.
#[derive(Debug, Clone, Resource, Reflect)]
#[reflect(Resource)]
pub struct ClippingAnimator {
    /// Clip the model at all? When `false` no planes are active and the helper is hidden.
    pub enabled: bool,
    /// Clock increment per frame.
    pub animation_speed: f32,
    /// Depth of both planes, how much of the model is revealed around the origin.
    pub plane_distance: f32,
    /// Path of the plane direction.
    pub animation: ClippingAnimation,
    /// The helper shape and its rebuild state.
    pub helper: ClippingHelper,
    clock: f32,
    direction: Vec3,
    planes: PlanePair,
}

impl Default for ClippingAnimator {
    fn default() -> Self {
        Self::new(ClippingHelperConfig::default())
    }
}

impl ClippingAnimator {
    /// An animator with the given helper config and default animation.
    pub fn new(helper: ClippingHelperConfig) -> Self {
        let plane_distance = 0.6;
        Self {
            enabled: true,
            animation_speed: 0.003,
            plane_distance,
            animation: ClippingAnimation::default(),
            helper: ClippingHelper::new(helper),
            clock: 0.0,
            direction: Vec3::X,
            planes: PlanePair::new(Vec3::X, plane_distance),
        }
    }

    /// The animation clock.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// The current unit plane direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// The planes to clip with, or `None` while clipping is disabled.
    pub fn active_planes(&self) -> Option<&PlanePair> {
        self.enabled.then_some(&self.planes)
    }

    /// Advance the animation by one frame.
    pub fn update(&mut self) -> Option<&PlanePair> {
        self.clock += self.animation_speed;

        if !self.enabled {
            self.helper.visible = false;
            return None;
        }
        self.helper.visible = true;

        let t = self.clock * 0.5;
        self.direction = self.animation.direction(t);
        self.planes = PlanePair::new(self.direction, self.plane_distance);
        self.helper.rotation = Quat::from_rotation_arc(Vec3::Z, self.direction);
        trace!("Clipping direction {:?}", self.direction);

        Some(&self.planes)
    }

    /// Merge a helper config change and rebuild the helper, deferring while another rebuild is in
    /// transition.
    pub fn update_clipping_helper_shape(&mut self, update: HelperShapeUpdate) -> Rebuild {
        self.helper.rebuild(update)
    }

    fn update_planes(mut animator: ResMut<Self>) {
        animator.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planes_stay_opposed_and_normalized() {
        let mut animator = ClippingAnimator::default();
        for _ in 0..20_000 {
            let planes = *animator.update().expect("clipping is enabled");
            assert_eq!(planes.b.normal, -planes.a.normal);
            assert!((planes.a.normal.length() - 1.0).abs() < 1e-5);
            assert_eq!(planes.a.constant, animator.plane_distance);
            assert_eq!(planes.b.constant, animator.plane_distance);
        }
    }

    #[test]
    fn direction_follows_sinusoids() {
        let mut animator = ClippingAnimator::default();
        animator.update();
        let t: f32 = 0.003 * 0.5;
        let expected = Vec3::new((1.2 * t).sin(), (1.3 * t - 1.0).sin(), (1.3 * t + 2.0).cos())
            .normalize();
        assert!((animator.direction() - expected).length() < 1e-6);
        assert!((animator.helper.rotation * Vec3::Z - expected).length() < 1e-5);
    }

    #[test]
    fn disabled_clears_planes_and_hides_helper() {
        let mut animator = ClippingAnimator::default();
        animator.update();
        animator.enabled = false;
        let clock = animator.clock();
        assert!(animator.update().is_none());
        assert!(animator.active_planes().is_none());
        assert!(!animator.helper.visible);
        assert!(animator.clock() > clock);

        animator.enabled = true;
        assert!(animator.update().is_some());
        assert!(animator.helper.visible);
    }

    #[test]
    fn shape_changes_without_presenter() {
        let mut animator = ClippingAnimator::default();
        for _ in 0..100 {
            animator.update();
        }
        let rebuild = animator.update_clipping_helper_shape(HelperShapeUpdate {
            shape: Some(helper::HelperShape::Torus),
            ..Default::default()
        });
        assert!(matches!(rebuild, Rebuild::Applied(_)));
        assert!(animator.helper.staged().is_none());
        assert!(matches!(
            animator.helper.presented(),
            Some(helper::HelperGeometry::Torus { .. })
        ));
    }

    #[test]
    fn slab_contains_origin() {
        let planes = PlanePair::new(Vec3::new(0.0, 2.0, 0.0), 0.6);
        assert!(planes.contains(Vec3::ZERO));
        assert!(planes.contains(Vec3::new(5.0, 0.5, -3.0)));
        assert!(!planes.contains(Vec3::new(0.0, 0.7, 0.0)));
        assert!(!planes.contains(Vec3::new(0.0, -0.7, 0.0)));
    }
}
