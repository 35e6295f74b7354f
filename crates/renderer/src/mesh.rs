//! Second example: an uploaded triangle mesh coloured by its normals, seen
//! from a camera orbiting at a distance derived from the mesh extent.

use std::num::NonZeroU64;

use asset::TriangleSoup;
use bytemuck::{Pod, Zeroable};
use corelib::{Camera, Mat4, OrbitPath};
use wgpu::{
    BindGroup, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType, Buffer,
    BufferBindingType, BufferUsages, Device, Queue, RenderPass, RenderPipeline, ShaderStages,
    util::DeviceExt,
};

use crate::scene::{FrameInfo, Scene};
use crate::{PipelineDesc, RenderError, TargetFormats, build_pipeline};

/// Uniform block matching `Matrices` in `mesh.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshUniform {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

impl MeshUniform {
    pub fn new(camera: &Camera, model: Mat4) -> Self {
        Self {
            projection: camera.proj().to_cols_array_2d(),
            view: camera.view().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        }
    }
}

const FLOAT3_LAYOUT_STRIDE: u64 = std::mem::size_of::<[f32; 3]>() as u64;

const POSITION_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: FLOAT3_LAYOUT_STRIDE,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
};

const NORMAL_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: FLOAT3_LAYOUT_STRIDE,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &wgpu::vertex_attr_array![1 => Float32x3],
};

/// GPU copy of one loaded mesh.
struct MeshBuffers {
    positions: Buffer,
    normals: Buffer,
    vertex_count: u32,
    orbit: OrbitPath,
}

pub struct MeshScene {
    pipeline: RenderPipeline,
    uniform_buf: Buffer,
    uniform_bg: BindGroup,
    camera: Camera,
    mesh: Option<MeshBuffers>,
}

impl MeshScene {
    pub fn new(device: &Device, targets: TargetFormats) -> Result<Self, RenderError> {
        log::info!("Initializing program");

        let uniform_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Mesh Uniform BGL"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<MeshUniform>() as u64),
                },
                count: None,
            }],
        });

        let pipeline = build_pipeline(
            device,
            targets,
            PipelineDesc {
                label: "Mesh Pipeline",
                wgsl: include_str!("shaders/mesh.wgsl"),
                vertex_buffers: &[POSITION_LAYOUT, NORMAL_LAYOUT],
                bind_group_layouts: &[&uniform_bgl],
            },
        )?;

        let camera = Camera::mesh_viewer(1.0);
        let uniform_init = MeshUniform::new(&camera, Mat4::IDENTITY);
        let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh UBO"),
            contents: bytemuck::bytes_of(&uniform_init),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let uniform_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Uniform BG"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buf.as_entire_binding(),
            }],
        });

        Ok(Self {
            pipeline,
            uniform_buf,
            uniform_bg,
            camera,
            mesh: None,
        })
    }
}

/// Camera for frame time `elapsed` when orbiting `orbit`.
pub fn orbit_camera(base: Camera, orbit: OrbitPath, frame: &FrameInfo) -> Camera {
    base.with_eye(orbit.eye_at(frame.elapsed))
        .with_aspect(frame.aspect)
}

impl Scene for MeshScene {
    fn label(&self) -> &'static str {
        "mesh"
    }

    fn update(&mut self, queue: &Queue, frame: &FrameInfo) {
        let Some(mesh) = &self.mesh else {
            return;
        };
        self.camera = orbit_camera(self.camera, mesh.orbit, frame);
        let uniform = MeshUniform::new(&self.camera, Mat4::IDENTITY);
        queue.write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(&uniform));
    }

    fn draw(&self, pass: &mut RenderPass<'_>) {
        let Some(mesh) = &self.mesh else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bg, &[]);
        pass.set_vertex_buffer(0, mesh.positions.slice(..));
        pass.set_vertex_buffer(1, mesh.normals.slice(..));
        pass.draw(0..mesh.vertex_count, 0..1);
    }

    fn load_mesh(&mut self, device: &Device, soup: &TriangleSoup) -> Result<(), RenderError> {
        let invalid = || RenderError::InvalidMesh {
            vertices: soup.vertex_count(),
        };
        if !soup.is_valid() {
            return Err(invalid());
        }
        let vertex_count = u32::try_from(soup.vertex_count()).map_err(|_| invalid())?;

        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Positions"),
            contents: bytemuck::cast_slice(&soup.positions),
            usage: BufferUsages::VERTEX,
        });
        let normals = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Normals"),
            contents: bytemuck::cast_slice(&soup.normals),
            usage: BufferUsages::VERTEX,
        });

        let orbit = OrbitPath::new(soup.bounding_extent());
        log::info!(
            "Mesh uploaded: {} vertices, orbit radius {:.2}",
            vertex_count,
            orbit.radius()
        );
        if self.mesh.is_none() {
            log::info!("Starting rendering loop");
        }

        self.mesh = Some(MeshBuffers {
            positions,
            normals,
            vertex_count,
            orbit,
        });
        Ok(())
    }
}
