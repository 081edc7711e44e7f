use std::marker::PhantomData;

use bevy::{
    prelude::*,
    core_pipeline::{
        core_3d::graph::{
            Core3d,
            Node3d,
        },
        fullscreen_vertex_shader::fullscreen_shader_vertex_state,
    },
    ecs::query::QueryItem,
    image::BevyDefault,
    render::{
        extract_component::{
            ComponentUniforms,
            DynamicUniformIndex,
            ExtractComponent,
            ExtractComponentPlugin,
            UniformComponentPlugin,
        },
        render_graph::{
            NodeRunError,
            RenderGraphApp,
            RenderGraphContext,
            RenderLabel,
            ViewNode,
            ViewNodeRunner,
        },
        render_resource::{
            binding_types::{
                sampler,
                texture_2d,
                uniform_buffer,
            },
            encase::internal::WriteInto,
            *,
        },
        renderer::{
            RenderContext,
            RenderDevice,
        },
        view::ViewTarget,
        ExtractSchedule,
        MainWorld,
        RenderApp,
    },
};

use crate::error::SkullPointsError;

pub mod background;
pub mod lens_distortion;

pub use background::{
    BackgroundLabel,
    ShaderBackground,
};
pub use lens_distortion::{
    LensDistortion,
    LensDistortionLabel,
};


/// Full-screen chain run after tonemapping: animated background, then lens distortion.
#[derive(Default)]
pub struct PostProcessPlugin;

impl Plugin for PostProcessPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            background::BackgroundPlugin,
            lens_distortion::LensDistortionPlugin,
        ));

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app.add_render_graph_edges(
            Core3d,
            (
                Node3d::Tonemapping,
                BackgroundLabel,
                LensDistortionLabel,
                Node3d::EndMainPassPostProcessing,
            ),
        );
    }
}


/// A single-pass full-screen effect driven by one camera component.
///
/// The component is extracted to the render world and bound as a dynamic uniform next
/// to the current view texture.
pub trait FullscreenEffect:
    Component
    + ExtractComponent
    + ShaderType
    + WriteInto
    + Clone
{
    const NAME: &'static str;

    type Label: RenderLabel + Default;

    fn shader() -> Handle<Shader>;
}


pub struct FullscreenEffectPlugin<T: FullscreenEffect>(PhantomData<T>);

impl<T: FullscreenEffect> Default for FullscreenEffectPlugin<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: FullscreenEffect> Plugin for FullscreenEffectPlugin<T> {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            ExtractComponentPlugin::<T>::default(),
            UniformComponentPlugin::<T>::default(),
        ));

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app
            .add_render_graph_node::<ViewNodeRunner<FullscreenNode<T>>>(
                Core3d,
                T::Label::default(),
            )
            .add_systems(ExtractSchedule, report_pipeline_errors::<T>);
    }

    fn finish(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app.init_resource::<FullscreenPipeline<T>>();
    }
}


pub struct FullscreenNode<T: FullscreenEffect>(PhantomData<T>);

impl<T: FullscreenEffect> Default for FullscreenNode<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: FullscreenEffect> ViewNode for FullscreenNode<T> {
    type ViewQuery = (
        &'static ViewTarget,
        &'static DynamicUniformIndex<T>,
    );

    fn run<'w>(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext<'w>,
        (view_target, settings_index): QueryItem<'w, Self::ViewQuery>,
        world: &'w World,
    ) -> Result<(), NodeRunError> {
        let effect_pipeline = world.resource::<FullscreenPipeline<T>>();
        let pipeline_cache = world.resource::<PipelineCache>();

        let Some(pipeline) = pipeline_cache.get_render_pipeline(effect_pipeline.pipeline_id) else {
            return Ok(());
        };

        let settings_uniforms = world.resource::<ComponentUniforms<T>>();
        let Some(settings_binding) = settings_uniforms.uniforms().binding() else {
            return Ok(());
        };

        let post_process = view_target.post_process_write();

        let bind_group = render_context.render_device().create_bind_group(
            Some(effect_pipeline.bind_group_label.as_str()),
            &effect_pipeline.layout,
            &BindGroupEntries::sequential((
                post_process.source,
                &effect_pipeline.sampler,
                settings_binding.clone(),
            )),
        );

        let mut render_pass = render_context.begin_tracked_render_pass(RenderPassDescriptor {
            label: Some(T::NAME),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: post_process.destination,
                resolve_target: None,
                ops: Operations::default(),
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_render_pipeline(pipeline);
        render_pass.set_bind_group(0, &bind_group, &[settings_index.index()]);
        render_pass.draw(0..3, 0..1);

        Ok(())
    }
}


#[derive(Resource)]
pub struct FullscreenPipeline<T: FullscreenEffect> {
    layout: BindGroupLayout,
    sampler: Sampler,
    pipeline_id: CachedRenderPipelineId,
    bind_group_label: String,
    _marker: PhantomData<T>,
}

impl<T: FullscreenEffect> FromWorld for FullscreenPipeline<T> {
    fn from_world(world: &mut World) -> Self {
        let render_device = world.resource::<RenderDevice>();

        let layout = render_device.create_bind_group_layout(
            Some(format!("{}_bind_group_layout", T::NAME).as_str()),
            &BindGroupLayoutEntries::sequential(
                ShaderStages::FRAGMENT,
                (
                    texture_2d(TextureSampleType::Float { filterable: true }),
                    sampler(SamplerBindingType::Filtering),
                    uniform_buffer::<T>(true),
                ),
            ),
        );

        let sampler = render_device.create_sampler(&SamplerDescriptor {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..default()
        });

        let pipeline_id = world
            .resource_mut::<PipelineCache>()
            .queue_render_pipeline(RenderPipelineDescriptor {
                label: Some(format!("{}_pipeline", T::NAME).into()),
                layout: vec![layout.clone()],
                vertex: fullscreen_shader_vertex_state(),
                fragment: Some(FragmentState {
                    shader: T::shader(),
                    shader_defs: vec![],
                    entry_point: "fragment".into(),
                    targets: vec![Some(ColorTargetState {
                        format: TextureFormat::bevy_default(),
                        blend: None,
                        write_mask: ColorWrites::ALL,
                    })],
                }),
                primitive: PrimitiveState::default(),
                depth_stencil: None,
                multisample: MultisampleState::default(),
                push_constant_ranges: vec![],
                zero_initialize_workgroup_memory: false,
            });

        Self {
            layout,
            sampler,
            pipeline_id,
            bind_group_label: format!("{}_bind_group", T::NAME),
            _marker: PhantomData,
        }
    }
}


fn report_pipeline_errors<T: FullscreenEffect>(
    pipeline: Option<Res<FullscreenPipeline<T>>>,
    pipeline_cache: Res<PipelineCache>,
    mut main_world: ResMut<MainWorld>,
    mut reported: Local<bool>,
) {
    if *reported {
        return;
    }

    let Some(pipeline) = pipeline else {
        return;
    };

    if let CachedPipelineState::Err(err) = pipeline_cache.get_render_pipeline_state(pipeline.pipeline_id) {
        let error = SkullPointsError::ShaderCompile {
            pipeline: T::NAME.to_string(),
            reason: err.to_string(),
        };
        error!("{error}");

        main_world.send_event(AppExit::error());
        *reported = true;
    }
}
