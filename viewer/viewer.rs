use bevy::{
    prelude::*,
    app::AppExit,
    diagnostic::{
        DiagnosticsStore,
        FrameTimeDiagnosticsPlugin,
    },
};
use bevy_args::{
    BevyArgsPlugin,
    parse_args,
};
use bevy_inspector_egui::{
    bevy_egui::EguiPlugin,
    quick::WorldInspectorPlugin,
};
use bevy_panorbit_camera::PanOrbitCameraPlugin;

use bevy_skull_points::{
    SkullPointsPlugin,
    utils::{
        SkullPointsViewer,
        log,
        setup_hooks,
    },
};


fn viewer_app() {
    let config = parse_args::<SkullPointsViewer>();
    log(&format!("{config:?}"));

    let mut app = App::new();

    #[cfg(target_arch = "wasm32")]
    let primary_window = Some(Window {
        fit_canvas_to_parent: true,
        mode: bevy::window::WindowMode::Windowed,
        present_mode: bevy::window::PresentMode::AutoVsync,
        prevent_default_event_handling: true,
        title: config.name.clone(),
        ..default()
    });

    #[cfg(not(target_arch = "wasm32"))]
    let primary_window = Some(Window {
        mode: bevy::window::WindowMode::Windowed,
        present_mode: bevy::window::PresentMode::AutoVsync,
        prevent_default_event_handling: false,
        resolution: (config.width, config.height).into(),
        title: config.name.clone(),
        ..default()
    });

    app.insert_resource(config.session());
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window,
                ..default()
            }),
    );
    app.add_plugins(BevyArgsPlugin::<SkullPointsViewer>::default());
    app.add_plugins(PanOrbitCameraPlugin);

    if config.editor {
        app.add_plugins(EguiPlugin {
            enable_multipass_for_primary_context: true,
        });
        app.add_plugins(WorldInspectorPlugin::new());
    }

    if config.press_esc_close {
        app.add_systems(Update, esc_close);
    }

    if config.show_fps {
        app.add_plugins(FrameTimeDiagnosticsPlugin::default());
        app.add_systems(Startup, fps_display_setup);
        app.add_systems(Update, fps_update_system);
    }

    app.add_plugins(SkullPointsPlugin);

    app.run();
}


pub fn esc_close(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}


#[derive(Component)]
struct FpsText;

fn fps_display_setup(
    mut commands: Commands,
) {
    commands
        .spawn((
            Text::new("fps: "),
            TextFont {
                font_size: 36.0,
                ..default()
            },
            TextColor(Color::WHITE),
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(5.0),
                left: Val::Px(15.0),
                ..default()
            },
        ))
        .with_child((
            TextSpan::default(),
            TextFont {
                font_size: 36.0,
                ..default()
            },
            TextColor(Color::srgb(1.0, 0.84, 0.0)),
            FpsText,
        ));
}

fn fps_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut TextSpan, With<FpsText>>,
) {
    for mut span in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                **span = format!("{value:.2}");
            }
        }
    }
}


pub fn main() {
    setup_hooks();
    viewer_app();
}
