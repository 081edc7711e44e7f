use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCameraPlugin;

pub use camera::{
    CameraIntro,
    IntroPhase,
    IntroSettings,
    OrbitLimits,
};
pub use cloud::{
    PointCloud,
    PointCloudBuilder,
    PointCloudHandle,
};
pub use cursor::CursorState;
pub use error::SkullPointsError;
pub use material::{
    ForceField,
    PointCloudMaterial,
    PointCloudMaterialPlugin,
    PointStyle,
};
pub use mesh::{
    MeshSurfaceSampler,
    TriangleSoup,
};
pub use schedule::SkullPointsSet;
pub use session::{
    LoadPhase,
    Session,
    Variant,
};

#[cfg(feature = "post_process")]
pub use post_process::{
    LensDistortion,
    PostProcessPlugin,
    ShaderBackground,
};

pub mod camera;
pub mod cloud;
pub mod cursor;
pub mod error;
pub mod material;
pub mod mesh;
pub mod schedule;
pub mod session;
pub mod utils;
pub mod viewport;

#[cfg(feature = "post_process")]
pub mod post_process;


/// Loads the model, samples it, spawns the cloud and camera, and drives them every frame.
///
/// Insert a [`Session`] before adding the plugin to pick the variant and asset paths;
/// otherwise the classic variant with default paths is used.
#[derive(Default)]
pub struct SkullPointsPlugin;

impl Plugin for SkullPointsPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<PointCloud>();
        app.register_asset_reflect::<PointCloud>();

        app.register_type::<CursorState>();
        app.register_type::<OrbitLimits>();
        app.register_type::<PointCloudHandle>();

        app.init_resource::<CursorState>();
        app.init_resource::<Session>();

        if !app.is_plugin_added::<PanOrbitCameraPlugin>() {
            app.add_plugins(PanOrbitCameraPlugin);
        }

        app.add_plugins(PointCloudMaterialPlugin);

        #[cfg(feature = "post_process")]
        app.add_plugins(PostProcessPlugin);

        schedule::configure_sets(app);

        app.add_systems(
            Startup,
            (
                session::load_model,
                session::spawn_camera,
            ),
        );

        app.add_systems(
            Update,
            (
                session::build_point_cloud.in_set(SkullPointsSet::Load),
                (
                    camera::start_camera_intro,
                    camera::animate_camera_intro,
                ).chain().in_set(SkullPointsSet::Tween),
                camera::auto_rotate.in_set(SkullPointsSet::Controls),
                (
                    cursor::track_cursor,
                    cursor::apply_cursor_uniform,
                ).chain().in_set(SkullPointsSet::Uniforms),
            ),
        );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(
            Update,
            viewport::cap_pixel_ratio.in_set(SkullPointsSet::Uniforms),
        );

        #[cfg(feature = "post_process")]
        app.add_systems(
            Update,
            (
                viewport::init_background_resolution,
                viewport::resize_background,
            ).chain().in_set(SkullPointsSet::Uniforms),
        );
    }
}
