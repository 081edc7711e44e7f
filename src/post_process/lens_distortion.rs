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

use crate::post_process::{
    FullscreenEffect,
    FullscreenEffectPlugin,
};


const LENS_DISTORTION_SHADER_HANDLE: Handle<Shader> = weak_handle!("7c2d9e41-0a6b-4f38-b5e2-d19f4c8a3e60");


#[derive(Debug, Hash, PartialEq, Eq, Clone, Default, RenderLabel)]
pub struct LensDistortionLabel;


/// Barrel distortion with per-channel dispersion, applied last in the chain.
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
pub struct LensDistortion {
    /// Positive bulges outwards, negative pinches.
    pub strength: f32,
    /// Values above one crop into the distorted image.
    pub zoom: f32,
    /// Horizontal stretch of the distortion; one keeps it radial.
    pub cylindrical_ratio: f32,
    /// Spread between the red and blue channel distortion.
    pub dispersion: f32,
}

impl Default for LensDistortion {
    fn default() -> Self {
        Self {
            strength: 0.35,
            zoom: 1.1,
            cylindrical_ratio: 1.0,
            dispersion: 0.06,
        }
    }
}

impl LensDistortion {
    /// CPU mirror of the shader's coordinate remap for a single channel.
    pub fn distort_uv(&self, uv: Vec2, channel_strength: f32) -> Vec2 {
        let center = uv - 0.5;
        let r2 = (center * Vec2::new(self.cylindrical_ratio, 1.0)).length_squared();
        let factor = 1.0 + channel_strength * r2;
        0.5 + center * factor / self.zoom.max(f32::EPSILON)
    }

    /// Red, green and blue strengths.
    pub fn channel_strengths(&self) -> [f32; 3] {
        [
            self.strength * (1.0 + self.dispersion),
            self.strength,
            self.strength * (1.0 - self.dispersion),
        ]
    }
}

impl FullscreenEffect for LensDistortion {
    const NAME: &'static str = "lens_distortion";

    type Label = LensDistortionLabel;

    fn shader() -> Handle<Shader> {
        LENS_DISTORTION_SHADER_HANDLE
    }
}


#[derive(Default)]
pub struct LensDistortionPlugin;

impl Plugin for LensDistortionPlugin {
    fn build(&self, app: &mut App) {
        load_internal_asset!(
            app,
            LENS_DISTORTION_SHADER_HANDLE,
            "lens_distortion.wgsl",
            Shader::from_wgsl
        );

        app.register_type::<LensDistortion>();
        app.add_plugins(FullscreenEffectPlugin::<LensDistortion>::default());
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_fixed() {
        let lens = LensDistortion::default();
        for strength in lens.channel_strengths() {
            assert_eq!(lens.distort_uv(Vec2::splat(0.5), strength), Vec2::splat(0.5));
        }
    }

    #[test]
    fn positive_strength_pushes_edges_outwards() {
        let lens = LensDistortion {
            zoom: 1.0,
            ..default()
        };
        let edge = lens.distort_uv(Vec2::new(1.0, 0.5), lens.strength);
        assert!(edge.x > 1.0);
        assert_eq!(edge.y, 0.5);
    }

    #[test]
    fn dispersion_separates_channels() {
        let [red, green, blue] = LensDistortion::default().channel_strengths();
        assert!(red > green && green > blue);
    }
}
