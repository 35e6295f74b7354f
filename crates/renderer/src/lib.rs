//! Renderer: wgpu init + depth + the two example scenes.
//! wgpu = 26.x, winit = 0.30.x

use std::sync::Arc;

use wgpu::{
    Backends, CommandEncoderDescriptor, Device, DeviceDescriptor, Extent3d, Features, Instance,
    InstanceDescriptor, Limits, LoadOp, Operations, PowerPreference, PresentMode, Queue,
    RenderPassColorAttachment, RenderPassDescriptor, StoreOp, Surface, SurfaceConfiguration,
    SurfaceError, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
    TextureViewDescriptor,
};
use winit::{dpi::PhysicalSize, window::Window};

mod error;
mod mesh;
mod pipeline;
mod quad;
mod scene;

pub use asset::TriangleSoup;
pub use error::RenderError;
pub use mesh::{MeshScene, MeshUniform};
pub use pipeline::{PipelineDesc, TargetFormats, build_pipeline};
pub use quad::QuadScene;
pub use scene::{ExampleKind, FrameInfo, Scene};

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Background colour shared by both examples (warm grey).
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.55686,
    g: 0.54902,
    b: 0.52157,
    a: 1.0,
};

/// Device and surface options.
#[derive(Clone, Debug)]
pub struct GpuInit {
    pub backends: Backends,
    /// Pick an sRGB surface format when one exists. Off by default: the
    /// example colours are authored for a non-sRGB canvas.
    pub prefer_srgb: bool,
    pub present_mode: PresentMode,
    pub required_limits: Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: Backends::all(),
            prefer_srgb: false,
            present_mode: PresentMode::AutoVsync,
            required_limits: Limits::downlevel_webgl2_defaults(),
        }
    }
}

pub struct GpuState {
    // Surface
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    // Depth
    depth_view: TextureView,

    // Size cache
    width: u32,
    height: u32,
}

impl GpuState {
    /// Create GPU state bound to an Arc<Window>.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self, RenderError> {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        log::info!("Setting up the surface ({}x{})", width, height);

        // Instance & surface
        let instance = Instance::new(&InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("Adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Meshview Device"),
                required_features: Features::empty(),
                required_limits: init.required_limits.using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = choose_surface_format(&caps.formats, init.prefer_srgb)
            .ok_or(RenderError::NoSurfaceFormat)?;
        log::info!("Surface format: {:?}", surface_format);

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: init.present_mode,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, &surface_config);

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            depth_view,
            width,
            height,
        })
    }

    pub fn targets(&self) -> TargetFormats {
        TargetFormats {
            color: self.surface_config.format,
            depth: DEPTH_FORMAT,
        }
    }

    /// Build the scene for `kind` against this device and surface.
    pub fn build_scene(&self, kind: ExampleKind) -> Result<Box<dyn Scene>, RenderError> {
        kind.build(&self.device, self.targets())
    }

    /// Resize: reconfigure surface & recreate depth view.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.surface_config.width = self.width;
        self.surface_config.height = self.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    /// Render one frame: update scene uniforms, clear colour + depth, let the
    /// scene record its draw call.
    pub fn render(&mut self, scene: &mut dyn Scene, elapsed: f32) -> Result<(), SurfaceError> {
        let frame_info = FrameInfo {
            elapsed,
            aspect: corelib::aspect_ratio(self.width, self.height),
        };
        scene.update(&self.queue, &frame_info);

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("MainPass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(CLEAR_COLOR),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            scene.draw(&mut rpass);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Upload `mesh` into `scene` using this device.
    pub fn load_mesh(&self, scene: &mut dyn Scene, mesh: &TriangleSoup) -> Result<(), RenderError> {
        scene.load_mesh(&self.device, mesh)
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }
}

/// Pick the first format with the requested sRGB-ness, falling back to the
/// first supported one.
fn choose_surface_format(formats: &[TextureFormat], prefer_srgb: bool) -> Option<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() == prefer_srgb)
        .or_else(|| formats.first().copied())
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: sc.width.max(1),
            height: sc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_format_prefers_linear_by_default() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(
            choose_surface_format(&formats, false),
            Some(TextureFormat::Bgra8Unorm)
        );
        assert_eq!(
            choose_surface_format(&formats, true),
            Some(TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn surface_format_falls_back_to_first() {
        let formats = [TextureFormat::Rgba8UnormSrgb];
        assert_eq!(
            choose_surface_format(&formats, false),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn default_init_targets_webgl2_limits() {
        let init = GpuInit::default();
        assert!(!init.prefer_srgb);
        assert_eq!(
            init.required_limits.max_texture_dimension_2d,
            Limits::downlevel_webgl2_defaults().max_texture_dimension_2d
        );
    }
}
