use bevy::{
    prelude::*,
    asset::{
        load_internal_asset,
        weak_handle,
    },
    render::{
        extract_component::ExtractComponent,
        render_graph::RenderLabel,
        render_resource::ShaderType,
    },
};

use crate::{
    post_process::{
        FullscreenEffect,
        FullscreenEffectPlugin,
    },
    schedule::SkullPointsSet,
};


const BACKGROUND_SHADER_HANDLE: Handle<Shader> = weak_handle!("b3f0a6d2-41c9-4e7b-8d15-6a2e9c0f7d48");


#[derive(Debug, Hash, PartialEq, Eq, Clone, Default, RenderLabel)]
pub struct BackgroundLabel;


/// Animated full-screen backdrop added underneath the point sprites.
///
/// `resolution` follows the window's physical size; `time` is seconds since startup.
#[derive(
    Clone,
    Component,
    Copy,
    Debug,
    ExtractComponent,
    PartialEq,
    Reflect,
    ShaderType,
)]
#[reflect(Component)]
pub struct ShaderBackground {
    pub resolution: Vec2,
    pub time: f32,
    pub intensity: f32,
    /// Linear rgb tint, alpha unused.
    pub color: Vec4,
}

impl Default for ShaderBackground {
    fn default() -> Self {
        Self {
            resolution: Vec2::new(1280.0, 720.0),
            time: 0.0,
            intensity: 1.0,
            color: Color::srgb_u8(0x2a, 0x06, 0x0c).to_linear().to_vec4(),
        }
    }
}

impl ShaderBackground {
    pub fn with_resolution(mut self, resolution: Vec2) -> Self {
        self.resolution = resolution;
        self
    }
}

impl FullscreenEffect for ShaderBackground {
    const NAME: &'static str = "shader_background";

    type Label = BackgroundLabel;

    fn shader() -> Handle<Shader> {
        BACKGROUND_SHADER_HANDLE
    }
}


pub fn update_background_time(
    time: Res<Time>,
    mut backgrounds: Query<&mut ShaderBackground>,
) {
    let elapsed = time.elapsed_secs();
    for mut background in &mut backgrounds {
        background.time = elapsed;
    }
}


#[derive(Default)]
pub struct BackgroundPlugin;

impl Plugin for BackgroundPlugin {
    fn build(&self, app: &mut App) {
        load_internal_asset!(
            app,
            BACKGROUND_SHADER_HANDLE,
            "background.wgsl",
            Shader::from_wgsl
        );

        app.register_type::<ShaderBackground>();
        app.add_plugins(FullscreenEffectPlugin::<ShaderBackground>::default());
        app.add_systems(
            Update,
            update_background_time.in_set(SkullPointsSet::Uniforms),
        );
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;

    use super::*;

    #[test]
    fn time_tracks_elapsed_seconds() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(250)))
            .add_systems(Update, update_background_time);

        let camera = app.world_mut().spawn(ShaderBackground::default()).id();

        app.update();
        app.update();
        app.update();

        let background = app.world().get::<ShaderBackground>(camera).unwrap();
        let elapsed = app.world().resource::<Time>().elapsed_secs();
        assert_eq!(background.time, elapsed);
        assert!(background.time > 0.0);
    }
}
