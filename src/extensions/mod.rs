//! Optional extensions to the base viewer.

#[cfg(feature = "extension_clip_indicator")]
pub mod clip_indicator;
pub mod cursor_light;
#[cfg(feature = "extension_helper_mesh")]
pub mod helper_mesh;
