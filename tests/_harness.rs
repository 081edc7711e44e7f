use std::time::Duration;

use bevy::{
    prelude::*,
    time::TimeUpdateStrategy,
    window::WindowResolution,
};


// headless: no window backend or renderer, systems under test are driven by hand


#[derive(Resource)]
pub struct TestHarness {
    pub frame_time: Duration,
}

impl Default for TestHarness {
    fn default() -> Self {
        TestHarness {
            frame_time: Duration::from_millis(100),
        }
    }
}

pub fn test_harness_app(
    harness: TestHarness,
) -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(harness.frame_time));
    app.insert_resource(harness);

    app
}

pub fn spawn_window(
    app: &mut App,
    width: f32,
    height: f32,
) -> Entity {
    app.world_mut()
        .spawn((
            Window {
                resolution: WindowResolution::new(width, height),
                ..default()
            },
            bevy::window::PrimaryWindow,
        ))
        .id()
}

pub fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Headless app with an asset server and the asset types the cloud loader reads and writes.
pub fn test_asset_app(
    harness: TestHarness,
) -> App {
    let mut app = test_harness_app(harness);

    app.add_plugins(AssetPlugin::default());
    app.init_asset::<Scene>();
    app.init_asset::<Mesh>();
    app.init_asset::<Image>();
    app.init_asset::<Shader>();

    app
}
