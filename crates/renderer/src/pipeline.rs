//! Shader compilation and the pipeline state shared by both scenes.

use wgpu::{
    BindGroupLayout, BlendState, ColorTargetState, ColorWrites, DepthBiasState, DepthStencilState,
    Device, ErrorFilter, FragmentState, PipelineLayoutDescriptor, RenderPipeline,
    RenderPipelineDescriptor, ShaderModuleDescriptor, ShaderSource, TextureFormat,
    VertexBufferLayout, VertexState,
};

use crate::RenderError;

/// Formats of the attachments a scene renders into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetFormats {
    pub color: TextureFormat,
    pub depth: TextureFormat,
}

/// Everything that differs between the two example pipelines.
pub struct PipelineDesc<'a> {
    pub label: &'static str,
    pub wgsl: &'a str,
    pub vertex_buffers: &'a [VertexBufferLayout<'a>],
    pub bind_group_layouts: &'a [&'a BindGroupLayout],
}

/// Runs `build` inside a validation error scope and turns any captured
/// validation error into [`RenderError::Shader`].
fn validated<T>(
    device: &Device,
    label: &'static str,
    build: impl FnOnce(&Device) -> T,
) -> Result<T, RenderError> {
    device.push_error_scope(ErrorFilter::Validation);
    let value = build(device);
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(RenderError::Shader {
            label,
            message: err.to_string(),
        }),
        None => Ok(value),
    }
}

/// Compile `desc.wgsl` and link it into a triangle-list pipeline with depth
/// testing (`LessEqual`) and no face culling.
pub fn build_pipeline(
    device: &Device,
    targets: TargetFormats,
    desc: PipelineDesc<'_>,
) -> Result<RenderPipeline, RenderError> {
    validated(device, desc.label, |device| {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(desc.label),
            source: ShaderSource::Wgsl(desc.wgsl.into()),
        });

        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: desc.bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: desc.vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: targets.color,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(DepthStencilState {
                format: targets.depth,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    })
}
