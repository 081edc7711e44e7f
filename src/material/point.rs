use bevy::{
    prelude::*,
    asset::{
        load_internal_asset,
        weak_handle,
    },
    pbr::{
        MaterialPipeline,
        MaterialPipelineKey,
    },
    render::{
        mesh::MeshVertexBufferLayoutRef,
        render_resource::{
            AsBindGroup,
            BlendComponent,
            BlendFactor,
            BlendOperation,
            BlendState,
            RenderPipelineDescriptor,
            ShaderRef,
            ShaderType,
            SpecializedMeshPipelineError,
        },
    },
};

use crate::material::force_field::ForceField;


const POINT_CLOUD_SHADER_HANDLE: Handle<Shader> = weak_handle!("5e1b27c4-8d0a-4f6e-9a3b-2c71d4e8f093");

/// `src_alpha * src + dst`
pub const ADDITIVE_BLEND: BlendState = BlendState {
    color: BlendComponent {
        src_factor: BlendFactor::SrcAlpha,
        dst_factor: BlendFactor::One,
        operation: BlendOperation::Add,
    },
    alpha: BlendComponent {
        src_factor: BlendFactor::SrcAlpha,
        dst_factor: BlendFactor::One,
        operation: BlendOperation::Add,
    },
};


/// Fixed look of the sampled points.
#[derive(Clone, Debug, Reflect)]
pub struct PointStyle {
    pub color: Color,
    /// Sprite size; attenuated with distance like a perspective point sprite.
    pub size: f32,
    pub opacity: f32,
    /// Per-point alpha mask, read from the green channel.
    pub alpha_map: Option<Handle<Image>>,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            color: Color::srgb_u8(0x5c, 0x0b, 0x17),
            size: 0.1,
            opacity: 0.8,
            alpha_map: None,
        }
    }
}


#[derive(Clone, Copy, Debug, Reflect, ShaderType)]
pub struct PointCloudUniform {
    /// Linear rgb, alpha unused.
    pub color: Vec4,
    pub repulsion_center: Vec3,
    pub size: f32,
    pub opacity: f32,
    pub radius: f32,
    pub min_force: f32,
    pub max_force: f32,
}

impl PointCloudUniform {
    pub fn new(style: &PointStyle, field: &ForceField) -> Self {
        Self {
            color: style.color.to_linear().to_vec4(),
            repulsion_center: field.center,
            size: style.size,
            opacity: style.opacity,
            radius: field.radius,
            min_force: field.min_force,
            max_force: field.max_force,
        }
    }

    pub fn force_field(&self) -> ForceField {
        ForceField {
            center: self.repulsion_center,
            radius: self.radius,
            min_force: self.min_force,
            max_force: self.max_force,
        }
    }
}


/// Point sprites displaced by the cursor force field.
///
/// Owns its whole shader program; the displacement lives in `point_cloud.wgsl` rather
/// than being spliced into a library shader.
#[derive(Asset, AsBindGroup, Clone, Debug, Reflect)]
pub struct PointCloudMaterial {
    #[uniform(0)]
    pub uniform: PointCloudUniform,

    #[texture(1)]
    #[sampler(2)]
    pub alpha_map: Option<Handle<Image>>,
}

impl PointCloudMaterial {
    pub fn new(style: &PointStyle, field: &ForceField) -> Self {
        Self {
            uniform: PointCloudUniform::new(style, field),
            alpha_map: style.alpha_map.clone(),
        }
    }

    pub fn set_repulsion_center(&mut self, center: Vec3) {
        self.uniform.repulsion_center = center;
    }
}

impl Material for PointCloudMaterial {
    fn vertex_shader() -> ShaderRef {
        POINT_CLOUD_SHADER_HANDLE.into()
    }

    fn fragment_shader() -> ShaderRef {
        POINT_CLOUD_SHADER_HANDLE.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];

        descriptor.primitive.cull_mode = None;

        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }

        if let Some(fragment) = descriptor.fragment.as_mut() {
            for target in fragment.targets.iter_mut().flatten() {
                target.blend = Some(ADDITIVE_BLEND);
            }
        }

        Ok(())
    }
}


#[derive(Default)]
pub struct PointCloudMaterialPlugin;

impl Plugin for PointCloudMaterialPlugin {
    fn build(&self, app: &mut App) {
        // registering the material twice would compile and bind the shader twice
        if app.is_plugin_added::<MaterialPlugin<PointCloudMaterial>>() {
            warn!("point cloud material already registered, skipping");
            return;
        }

        load_internal_asset!(
            app,
            POINT_CLOUD_SHADER_HANDLE,
            "point_cloud.wgsl",
            Shader::from_wgsl
        );

        app.register_type::<PointCloudMaterial>();
        app.register_type::<PointStyle>();

        app.add_plugins(MaterialPlugin::<PointCloudMaterial> {
            prepass_enabled: false,
            shadows_enabled: false,
            ..default()
        });
    }

    fn is_unique(&self) -> bool {
        false
    }
}
