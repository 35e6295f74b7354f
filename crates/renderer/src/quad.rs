//! First example: five coloured vertices, two indexed triangles, no transforms.

use wgpu::{Buffer, BufferUsages, Device, Queue, RenderPass, RenderPipeline, util::DeviceExt};

use crate::scene::{FrameInfo, Scene};
use crate::{PipelineDesc, RenderError, TargetFormats, build_pipeline};

/// Vertex positions in GL clip space, all on the near plane.
pub const POSITIONS: [[f32; 3]; 5] = [
    [0.5, 0.25, -1.0],
    [-0.5, 0.25, -1.0],
    [0.3, -0.5, -1.0],
    [-0.3, -0.5, -1.0],
    [0.0, 0.8, -1.0],
];

/// RGBA colour per vertex.
pub const COLOURS: [[f32; 4]; 5] = [
    [1.0, 0.5, 1.0, 1.0],
    [1.0, 0.5, 0.2, 1.0],
    [0.5, 0.9, 0.0, 1.0],
    [0.1, 0.9, 0.8, 1.0],
    [0.5, 0.6, 0.7, 1.0],
];

// The fifth vertex (the apex) is uploaded but never referenced by the index list.
pub const INDICES: [u16; 6] = [0, 1, 2, 1, 2, 3];

const POSITION_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<[f32; 3]>() as u64,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
};

const COLOUR_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<[f32; 4]>() as u64,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &wgpu::vertex_attr_array![1 => Float32x4],
};

pub struct QuadScene {
    pipeline: RenderPipeline,
    position_buf: Buffer,
    colour_buf: Buffer,
    index_buf: Buffer,
    index_count: u32,
}

impl QuadScene {
    pub fn new(device: &Device, targets: TargetFormats) -> Result<Self, RenderError> {
        log::info!("Initializing program");
        let pipeline = build_pipeline(
            device,
            targets,
            PipelineDesc {
                label: "Quad Pipeline",
                wgsl: include_str!("shaders/quad.wgsl"),
                vertex_buffers: &[POSITION_LAYOUT, COLOUR_LAYOUT],
                bind_group_layouts: &[],
            },
        )?;

        let position_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Positions"),
            contents: bytemuck::cast_slice(&POSITIONS),
            usage: BufferUsages::VERTEX,
        });
        let colour_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Colours"),
            contents: bytemuck::cast_slice(&COLOURS),
            usage: BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Indices"),
            contents: bytemuck::cast_slice(&INDICES),
            usage: BufferUsages::INDEX,
        });

        Ok(Self {
            pipeline,
            position_buf,
            colour_buf,
            index_buf,
            index_count: INDICES.len() as u32,
        })
    }
}

impl Scene for QuadScene {
    fn label(&self) -> &'static str {
        "quad"
    }

    // Nothing animates.
    fn update(&mut self, _queue: &Queue, _frame: &FrameInfo) {}

    fn draw(&self, pass: &mut RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.position_buf.slice(..));
        pass.set_vertex_buffer(1, self.colour_buf.slice(..));
        pass.set_index_buffer(self.index_buf.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
