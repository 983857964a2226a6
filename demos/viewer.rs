//! Loads a glTF model and lets you drag it around, while the clipping helper shows the animated
//! clipping planes sweeping around it.
//!
//! Pass a model path as the first argument, relative to the `assets` folder.
//!
//! Keys: `C` toggles clipping, `1`-`4` pick the helper shape, `W` toggles the wireframe and `F`
//! toggles cursor-follow.

use bevy::{
    asset::AssetLoadFailedEvent,
    pbr::wireframe::WireframePlugin,
    prelude::*,
    render::{
        settings::{RenderCreation, WgpuFeatures, WgpuSettings},
        RenderPlugin,
    },
    scene::SceneInstanceReady,
};
use bevy_elastic_viewer::{extensions::cursor_light::CursorLight, prelude::*};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins.set(RenderPlugin {
                // Needed to draw the helper as a wireframe
                render_creation: RenderCreation::Automatic(WgpuSettings {
                    features: WgpuFeatures::POLYGON_MODE_LINE,
                    ..default()
                }),
                ..default()
            }),
            WireframePlugin::default(),
            DefaultViewerPlugins, // Step 1: Add the viewer plugins
        ))
        .add_systems(Startup, setup)
        .add_systems(Update, (report_load_failure, settings_keys))
        .run();
}

fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "models/model.glb".to_owned());

    // Step 2: put a `ModelViewer` on the model root, and tell it when the model is ready.
    let model = commands
        .spawn((
            SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(path))),
            Transform::from_rotation(Quat::from_rotation_y(0.3)),
            ModelViewer::default(),
        ))
        .observe(
            |trigger: Trigger<SceneInstanceReady>, mut loaded: EventWriter<ModelLoaded>| {
                loaded.write(ModelLoaded {
                    viewer: trigger.target(),
                });
            },
        )
        .id();

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight::default(),
        Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        CursorLight::new(model),
    ));

    info!("C: clipping, 1-4: helper shape, W: wireframe, F: cursor follow");
}

//
// --- The below code is not important for the example ---
//

fn report_load_failure(
    mut failures: EventReader<AssetLoadFailedEvent<Scene>>,
    viewers: Query<Entity, With<ModelViewer>>,
    mut failed: EventWriter<ModelLoadFailed>,
) {
    for failure in failures.read() {
        for viewer in viewers.iter() {
            failed.write(ModelLoadFailed {
                viewer,
                reason: failure.error.to_string(),
            });
        }
    }
}

fn settings_keys(
    keys: Res<ButtonInput<KeyCode>>,
    clipping: Res<ClippingAnimator>,
    viewers: Query<&ModelViewer>,
    mut settings: EventWriter<ViewerSettings>,
) {
    if keys.just_pressed(KeyCode::KeyC) {
        settings.write(ViewerSettings::ClippingEnabled(!clipping.enabled));
    }
    if keys.just_pressed(KeyCode::KeyW) {
        settings.write(ViewerSettings::ClippingHelperShape(HelperShapeUpdate {
            wireframe: Some(!clipping.helper.config().wireframe),
            ..Default::default()
        }));
    }
    let shapes = [
        (KeyCode::Digit1, "sphere"),
        (KeyCode::Digit2, "torus"),
        (KeyCode::Digit3, "cone"),
        (KeyCode::Digit4, "default"),
    ];
    for (key, tag) in shapes {
        if keys.just_pressed(key) {
            settings.write(ViewerSettings::ClippingHelperShape(HelperShapeUpdate {
                shape: Some(HelperShape::from(tag)),
                ..Default::default()
            }));
        }
    }
    if keys.just_pressed(KeyCode::KeyF) {
        let enabled = viewers
            .iter()
            .next()
            .is_some_and(|viewer| viewer.params.cursor_follow.enabled);
        settings.write(ViewerSettings::CursorFollow(CursorFollowUpdate {
            enabled: Some(!enabled),
            ..Default::default()
        }));
    }
}
