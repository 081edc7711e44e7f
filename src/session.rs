use bevy::{
    prelude::*,
    asset::RecursiveDependencyLoadState,
    core_pipeline::tonemapping::Tonemapping,
    gltf::GltfAssetLabel,
    pbr::NotShadowCaster,
    render::view::NoFrustumCulling,
    window::PrimaryWindow,
};
use clap::ValueEnum;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    camera::{
        CameraIntro,
        IntroSettings,
        OrbitLimits,
        CAMERA_FAR,
        CAMERA_FOV_DEGREES,
        CAMERA_NEAR,
        INITIAL_CAMERA_POSITION,
    },
    cloud::{
        PointCloud,
        PointCloudBuilder,
        PointCloudHandle,
        CLASSIC_POINT_COUNT,
        POST_PROCESSED_POINT_COUNT,
    },
    error::SkullPointsError,
    material::{
        ForceField,
        PointCloudMaterial,
        PointStyle,
    },
    mesh::{
        MeshSurfaceSampler,
        TriangleSoup,
    },
};

#[cfg(feature = "post_process")]
use crate::post_process::{
    LensDistortion,
    ShaderBackground,
};


pub const DEFAULT_MODEL_PATH: &str = "models/gltf/Skull.glb";
pub const DEFAULT_TEXTURE_PATH: &str = "textures/particle.png";

pub const CLEAR_COLOR: Color = Color::srgb_u8(0x0c, 0x0c, 0x0c);


#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    Reflect,
    Serialize,
    Deserialize,
    ValueEnum,
)]
pub enum Variant {
    /// 9,000 points, delayed intro, no post-processing.
    #[default]
    Classic,
    /// 99,000 points, immediate intro, background and lens distortion passes.
    PostProcessed,
}

impl Variant {
    pub fn point_count(&self) -> usize {
        match self {
            Variant::Classic => CLASSIC_POINT_COUNT,
            Variant::PostProcessed => POST_PROCESSED_POINT_COUNT,
        }
    }

    pub fn intro_settings(&self) -> IntroSettings {
        match self {
            Variant::Classic => IntroSettings::default(),
            Variant::PostProcessed => IntroSettings::default().without_delay(),
        }
    }

    pub fn post_processed(&self) -> bool {
        matches!(self, Variant::PostProcessed)
    }
}


#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Reflect)]
pub enum LoadPhase {
    #[default]
    Loading,
    Ready,
    /// Terminal; the app has been asked to exit.
    Failed,
}


/// What to show and where it comes from, plus the progress of getting there.
#[derive(Resource, Clone, Debug)]
pub struct Session {
    pub variant: Variant,
    pub point_count: usize,
    pub seed: Option<u64>,
    pub model_path: String,
    pub texture_path: String,
    pub style: PointStyle,
    pub force_field: ForceField,
    pub msaa_samples: u8,

    phase: LoadPhase,
    model: Handle<Scene>,
    texture: Handle<Image>,
    cloud: Option<Entity>,
}


/// Where one input asset stands, as far as building the cloud is concerned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Ready,
    Failed(String),
}

impl AssetStatus {
    /// Assets added at runtime are not tracked by the server; they count as ready once present.
    pub fn of<A: Asset>(
        asset_server: &AssetServer,
        assets: &Assets<A>,
        handle: &Handle<A>,
    ) -> Self {
        match asset_server.get_recursive_dependency_load_state(handle) {
            Some(RecursiveDependencyLoadState::Loaded) => AssetStatus::Ready,
            Some(RecursiveDependencyLoadState::Failed(err)) => AssetStatus::Failed(err.to_string()),
            Some(_) => AssetStatus::Pending,
            None if assets.contains(handle) => AssetStatus::Ready,
            None => AssetStatus::Pending,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}

impl Session {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            point_count: variant.point_count(),
            seed: None,
            model_path: DEFAULT_MODEL_PATH.to_string(),
            texture_path: DEFAULT_TEXTURE_PATH.to_string(),
            style: PointStyle::default(),
            force_field: ForceField::default(),
            msaa_samples: 1,
            phase: LoadPhase::Loading,
            model: Handle::default(),
            texture: Handle::default(),
            cloud: None,
        }
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn cloud(&self) -> Option<Entity> {
        self.cloud
    }

    pub fn builder(&self) -> PointCloudBuilder {
        PointCloudBuilder {
            count: self.point_count,
            seed: self.seed,
        }
    }

    /// Uses already available assets instead of loading `model_path` and `texture_path`.
    pub fn with_assets(mut self, model: Handle<Scene>, texture: Handle<Image>) -> Self {
        self.style.alpha_map = Some(texture.clone());
        self.model = model;
        self.texture = texture;
        self
    }

    fn fail(&mut self, error: SkullPointsError, exit: &mut EventWriter<AppExit>) {
        error!("{error}");
        self.phase = LoadPhase::Failed;
        exit.write(AppExit::error());
    }
}


/// Merges every triangle mesh instanced by the scene, in mesh-local space.
///
/// Nodes without a mesh are ignored, as are meshes no node instances.
pub fn merge_scene_meshes(
    scene: &Scene,
    meshes: &Assets<Mesh>,
) -> Result<TriangleSoup, SkullPointsError> {
    let mut soup = TriangleSoup::default();

    for entity in scene.world.iter_entities() {
        let Some(mesh3d) = entity.get::<Mesh3d>() else {
            continue;
        };

        let Some(mesh) = meshes.get(&mesh3d.0) else {
            warn!("scene mesh {:?} has no data, skipping", mesh3d.0.id());
            continue;
        };

        soup.append(TriangleSoup::from_mesh(mesh)?);
    }

    Ok(soup)
}

pub fn sample_point_cloud(
    soup: TriangleSoup,
    builder: &PointCloudBuilder,
) -> Result<PointCloud, SkullPointsError> {
    let sampler = MeshSurfaceSampler::new(soup)?;
    debug!(
        "sampling {} points over {} triangles, area {:.3}",
        builder.count,
        sampler.triangle_count(),
        sampler.total_area(),
    );

    builder.build(&sampler)
}

pub fn spawn_point_cloud(
    commands: &mut Commands,
    cloud: PointCloud,
    material: PointCloudMaterial,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<PointCloudMaterial>,
    clouds: &mut Assets<PointCloud>,
) -> Entity {
    let mesh = meshes.add(cloud.to_render_mesh());

    commands
        .spawn((
            PointCloudHandle(clouds.add(cloud)),
            Mesh3d(mesh),
            MeshMaterial3d(materials.add(material)),
            Transform::IDENTITY,
            NoFrustumCulling,
            NotShadowCaster,
            Name::new("skull_points"),
        ))
        .id()
}


pub fn load_model(
    mut session: ResMut<Session>,
    asset_server: Res<AssetServer>,
) {
    info!("loading {} and {}", session.model_path, session.texture_path);

    let model = asset_server.load(GltfAssetLabel::Scene(0).from_asset(session.model_path.clone()));
    let texture = asset_server.load(session.texture_path.clone());

    session.model = model;
    session.texture = texture.clone();
    session.style.alpha_map = Some(texture);
}

#[allow(clippy::too_many_arguments)]
pub fn build_point_cloud(
    mut commands: Commands,
    mut session: ResMut<Session>,
    asset_server: Res<AssetServer>,
    scenes: Res<Assets<Scene>>,
    images: Res<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<PointCloudMaterial>>,
    mut clouds: ResMut<Assets<PointCloud>>,
    mut exit: EventWriter<AppExit>,
) {
    if session.phase != LoadPhase::Loading {
        return;
    }

    let texture = AssetStatus::of(&asset_server, &images, &session.texture);
    let model = AssetStatus::of(&asset_server, &scenes, &session.model);

    // both inputs must be in before anything is spawned
    let failure = [
        (&texture, session.texture_path.clone()),
        (&model, session.model_path.clone()),
    ]
        .into_iter()
        .find_map(|(status, path)| match status {
            AssetStatus::Failed(reason) => Some(SkullPointsError::AssetLoad {
                path,
                reason: reason.clone(),
            }),
            _ => None,
        });

    if let Some(error) = failure {
        session.fail(error, &mut exit);
        return;
    }

    if texture != AssetStatus::Ready || model != AssetStatus::Ready {
        return;
    }

    let Some(scene) = scenes.get(&session.model) else {
        return;
    };

    let cloud = merge_scene_meshes(scene, &meshes)
        .and_then(|soup| sample_point_cloud(soup, &session.builder()));

    let cloud = match cloud {
        Ok(cloud) => cloud,
        Err(error) => {
            session.fail(error, &mut exit);
            return;
        }
    };

    let point_count = cloud.len();
    let material = PointCloudMaterial::new(&session.style, &session.force_field);
    let entity = spawn_point_cloud(
        &mut commands,
        cloud,
        material,
        &mut meshes,
        &mut materials,
        &mut clouds,
    );

    session.cloud = Some(entity);
    session.phase = LoadPhase::Ready;

    info!("spawned {point_count} points ({:?})", session.variant);
}

pub fn spawn_camera(
    mut commands: Commands,
    session: Res<Session>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let intro_settings = session.variant.intro_settings();

    let camera = commands
        .spawn((
            Camera3d::default(),
            Camera {
                clear_color: ClearColorConfig::Custom(CLEAR_COLOR),
                ..default()
            },
            Projection::Perspective(PerspectiveProjection {
                fov: CAMERA_FOV_DEGREES.to_radians(),
                near: CAMERA_NEAR,
                far: CAMERA_FAR,
                ..default()
            }),
            Tonemapping::None,
            msaa_from_samples(session.msaa_samples),
            Transform::from_translation(INITIAL_CAMERA_POSITION).looking_at(intro_settings.focus, Vec3::Y),
            CameraIntro::new(intro_settings),
            OrbitLimits::default(),
            Name::new("skull_camera"),
        ))
        .id();

    if session.variant.post_processed() {
        let resolution = windows
            .single()
            .map(|window| window.physical_size().as_vec2())
            .ok();
        insert_post_process(&mut commands, camera, resolution);
    }
}

#[cfg(feature = "post_process")]
fn insert_post_process(commands: &mut Commands, camera: Entity, resolution: Option<Vec2>) {
    let mut background = ShaderBackground::default();
    if let Some(resolution) = resolution {
        background = background.with_resolution(resolution);
    }

    commands.entity(camera).insert((
        background,
        LensDistortion::default(),
    ));
}

#[cfg(not(feature = "post_process"))]
fn insert_post_process(_commands: &mut Commands, _camera: Entity, _resolution: Option<Vec2>) {
    warn!("built without the post_process feature, skipping background and lens distortion");
}

pub fn msaa_from_samples(samples: u8) -> Msaa {
    match samples {
        0 | 1 => Msaa::Off,
        2 => Msaa::Sample2,
        4 => Msaa::Sample4,
        8 => Msaa::Sample8,
        other => {
            warn!("unsupported msaa sample count {other}, using 4");
            Msaa::Sample4
        }
    }
}
