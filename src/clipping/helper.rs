//! The helper shape that visualizes the clipping planes, and its rebuild/swap lifecycle.
//!
//! Without a presenter the geometry is plain data: every rebuild is presented immediately. Once a
//! presenter owning a scene resource registers with [`ClippingHelper::register_presenter`],
//! rebuilding is split in two so that resources are never released while still in use:
//!
//! 1. [`ClippingHelper::rebuild`] merges the new config and stages the geometry to build, marking
//!    the helper as in transition.
//! 2. The presenter builds its resource from [`ClippingHelper::staged`] and calls
//!    [`ClippingHelper::complete_swap`], which installs it and hands back the previous resource, by
//!    value, to be released exactly once.
//!
//! A rebuild requested while another is in transition is deferred: the config is merged, but the
//! in-flight rebuild completes untouched.

use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

/// Which shape the helper takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum HelperShape {
    /// A sphere enclosing the scale.
    Sphere,
    /// A ring in the XY plane.
    Torus,
    /// A cone along Y.
    #[default]
    Cone,
    /// A UV sphere built directly from the raw scale: radius `x`, `y` sectors, `z` stacks.
    Default,
}

impl From<&str> for HelperShape {
    /// Decode a shape tag. Unknown tags fall back to [`HelperShape::Default`].
    fn from(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "sphere" => Self::Sphere,
            "torus" => Self::Torus,
            "cone" => Self::Cone,
            _ => Self::Default,
        }
    }
}

/// Settings of the clipping helper.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ClippingHelperConfig {
    /// The shape to build.
    pub shape: HelperShape,
    /// Draw the helper as a wireframe.
    pub wireframe: bool,
    /// Per-axis size, interpreted per shape.
    pub scale: Vec3,
}

impl Default for ClippingHelperConfig {
    fn default() -> Self {
        Self {
            shape: HelperShape::Cone,
            wireframe: true,
            scale: Vec3::new(5.0, 5.0, 1.2 - 0.0001),
        }
    }
}

/// A partial update of [`ClippingHelperConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HelperShapeUpdate {
    pub shape: Option<HelperShape>,
    pub wireframe: Option<bool>,
    pub scale: Option<Vec3>,
}

impl ClippingHelperConfig {
    /// Merge a partial update.
    pub fn merge(&mut self, update: HelperShapeUpdate) {
        self.shape = update.shape.unwrap_or(self.shape);
        self.wireframe = update.wireframe.unwrap_or(self.wireframe);
        self.scale = update.scale.unwrap_or(self.scale);
    }

    /// The geometry this config describes.
    pub fn geometry(&self) -> HelperGeometry {
        let scale = self.scale;
        match self.shape {
            HelperShape::Sphere => HelperGeometry::Sphere {
                radius: scale.max_element() / 2.0,
            },
            HelperShape::Torus => HelperGeometry::Torus {
                major_radius: scale.x.max(scale.y) / 2.0,
                minor_radius: scale.z / 2.0,
            },
            HelperShape::Cone => HelperGeometry::Cone {
                radius: scale.x / 2.0,
                height: scale.y,
            },
            HelperShape::Default => HelperGeometry::UvSphere {
                radius: scale.x,
                sectors: (scale.y.max(0.0) as u32).max(HelperGeometry::MIN_SECTORS),
                stacks: (scale.z.max(0.0) as u32).max(HelperGeometry::MIN_STACKS),
            },
        }
    }
}

/// Geometry parameters of the helper, decoded from [`ClippingHelperConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum HelperGeometry {
    /// A smooth sphere.
    Sphere {
        radius: f32,
    },
    /// A torus around the Z axis.
    Torus {
        /// Distance from the center to the middle of the tube.
        major_radius: f32,
        /// Radius of the tube.
        minor_radius: f32,
    },
    /// A cone along Y, centered on its half height.
    Cone {
        radius: f32,
        height: f32,
    },
    /// A sphere with explicit tessellation.
    UvSphere {
        radius: f32,
        sectors: u32,
        stacks: u32,
    },
}

impl HelperGeometry {
    /// Fewest sectors a UV sphere is built with.
    pub const MIN_SECTORS: u32 = 3;
    /// Fewest stacks a UV sphere is built with.
    pub const MIN_STACKS: u32 = 2;

    /// Rotation from the primitive's native frame into the helper frame. Bevy builds tori around
    /// the Y axis, the helper wants them around Z.
    pub fn alignment(&self) -> Quat {
        match self {
            HelperGeometry::Torus { .. } => Quat::from_rotation_x(core::f32::consts::FRAC_PI_2),
            _ => Quat::IDENTITY,
        }
    }
}

/// Outcome of [`ClippingHelper::rebuild`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rebuild {
    /// No presenter is registered, the new geometry is presented right away.
    Applied(HelperGeometry),
    /// New geometry was staged and is waiting for a presenter to swap it in.
    Started(HelperGeometry),
    /// Another rebuild is in transition. The config was merged and will be used by the next one.
    Deferred,
}

/// Config and lifecycle state of the clipping helper.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct ClippingHelper {
    config: ClippingHelperConfig,
    staged: Option<HelperGeometry>,
    presented: Option<HelperGeometry>,
    in_transition: bool,
    has_presenter: bool,
    swaps: u32,
    /// Orientation of the helper, facing the plane direction with its +Z axis.
    pub rotation: Quat,
    /// Should the helper be drawn?
    pub visible: bool,
}

impl Default for ClippingHelper {
    fn default() -> Self {
        Self::new(ClippingHelperConfig::default())
    }
}

impl ClippingHelper {
    /// A helper presenting the geometry of `config`, with no presenter registered.
    pub fn new(config: ClippingHelperConfig) -> Self {
        Self {
            config,
            staged: None,
            presented: Some(config.geometry()),
            in_transition: false,
            has_presenter: false,
            swaps: 0,
            rotation: Quat::IDENTITY,
            visible: true,
        }
    }

    /// The merged config.
    pub fn config(&self) -> &ClippingHelperConfig {
        &self.config
    }

    /// Geometry waiting to be swapped in, if a rebuild is in transition.
    pub fn staged(&self) -> Option<&HelperGeometry> {
        self.staged.as_ref()
    }

    /// Geometry currently presented in the scene.
    pub fn presented(&self) -> Option<&HelperGeometry> {
        self.presented.as_ref()
    }

    /// Is a rebuild waiting for its swap?
    pub fn in_transition(&self) -> bool {
        self.in_transition
    }

    /// Is a presenter swapping resources in?
    pub fn has_presenter(&self) -> bool {
        self.has_presenter
    }

    /// Hand presentation over to a presenter owning a scene resource. The current geometry is
    /// staged for it to build first, unless a rebuild is already staged.
    pub fn register_presenter(&mut self) {
        if self.has_presenter {
            return;
        }
        self.has_presenter = true;
        if self.staged.is_none() {
            self.staged = Some(self.config.geometry());
            self.in_transition = true;
        }
    }

    /// How many swaps have completed.
    pub fn swaps(&self) -> u32 {
        self.swaps
    }

    /// Merge `update` and stage new geometry, unless a rebuild is already in transition.
    pub fn rebuild(&mut self, update: HelperShapeUpdate) -> Rebuild {
        self.config.merge(update);
        if self.in_transition {
            debug!("Helper rebuild deferred, another rebuild is in transition");
            return Rebuild::Deferred;
        }
        let geometry = self.config.geometry();
        if !self.has_presenter {
            debug!("Helper geometry applied: {geometry:?}");
            self.presented = Some(geometry);
            return Rebuild::Applied(geometry);
        }
        debug!("Helper rebuild started: {geometry:?}");
        self.staged = Some(geometry);
        self.in_transition = true;
        Rebuild::Started(geometry)
    }

    /// Install `new` into `slot` as the presented resource for the staged geometry, ending the
    /// transition. Returns the previous resource for the caller to release, or `None` if nothing
    /// was presented before.
    ///
    /// Does nothing and returns `new` unchanged in `Err` when no rebuild is in transition, so a
    /// stale resource can be released by the caller instead of being swapped in twice.
    pub fn complete_swap<R>(&mut self, slot: &mut Option<R>, new: R) -> Result<Option<R>, R> {
        let Some(geometry) = self.staged.take() else {
            return Err(new);
        };
        self.presented = Some(geometry);
        self.in_transition = false;
        self.swaps += 1;
        Ok(slot.replace(new))
    }
}
