//! Translates window, mouse and touch input into [`ViewerInput`] events.
//!
//! Only the primary window is considered. Mouse presses use the left button. Touch input reports
//! every active touch point, so a second finger stops a drag from starting or continuing.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_input::prelude::*;
use bevy_math::prelude::*;
use bevy_window::{CursorMoved, PrimaryWindow, Window, WindowResized};

use crate::{
    controller::{events::ViewerInput, pointer::RawPointerEvent},
    ViewerSystems,
};

/// Feeds primary window input to every [`ModelViewer`](crate::prelude::ModelViewer).
pub struct ViewerInputPlugin;

impl Plugin for ViewerInputPlugin {
    fn build(&self, app: &mut App) {
        crate::configure_viewer_sets(app);
        app.add_event::<ViewerInput>().add_systems(
            Update,
            (sync_viewport, forward_pointer_input)
                .chain()
                .before(ViewerSystems::Input),
        );
    }
}

/// Sends the primary window size on startup and whenever it is resized.
pub fn sync_viewport(
    mut resized: EventReader<WindowResized>,
    window: Query<(Entity, &Window), With<PrimaryWindow>>,
    mut inputs: EventWriter<ViewerInput>,
    mut synced: Local<bool>,
) {
    let Ok((primary, window)) = window.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    let changed = resized.read().any(|event| event.window == primary);
    if changed || !*synced {
        inputs.write(ViewerInput::Resized(size));
        *synced = true;
    }
}

/// Sends press, move and release events for the mouse and touch points.
pub fn forward_pointer_input(
    mut cursor: EventReader<CursorMoved>,
    window: Query<(Entity, &Window), With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut inputs: EventWriter<ViewerInput>,
) {
    let Ok((primary, window)) = window.single() else {
        return;
    };

    let mut cursor_moved = false;
    for event in cursor.read().filter(|event| event.window == primary) {
        inputs.write(ViewerInput::Moved(RawPointerEvent::mouse(event.position)));
        cursor_moved = true;
    }

    if mouse.just_pressed(MouseButton::Left) {
        if let Some(position) = window.cursor_position() {
            inputs.write(ViewerInput::Pressed(RawPointerEvent::mouse(position)));
        }
    }

    let points = || RawPointerEvent::touch(touches.iter().map(|touch| touch.position()));
    if touches.iter_just_pressed().next().is_some() {
        inputs.write(ViewerInput::Pressed(points()));
    }
    let touch_moved = touches
        .iter()
        .any(|touch| touch.delta() != Vec2::ZERO);
    if touch_moved && !cursor_moved {
        inputs.write(ViewerInput::Moved(points()));
    }

    if mouse.just_released(MouseButton::Left)
        || touches.any_just_released()
        || touches.any_just_canceled()
    {
        inputs.write(ViewerInput::Released);
    }
}
