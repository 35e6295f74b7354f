//! Platform layer: window, event loop and the continuous redraw loop.
//!
//! One window, one scene. Every redraw renders a frame and requests the next
//! one, so frame pacing follows the compositor (vsync). Mesh files come from
//! the command line or from being dropped onto the window.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use renderer::{GpuState, Scene};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

mod clock;
mod config;

pub use clock::{FpsCounter, FrameClock, FrameTime};
pub use config::ViewerConfig;
pub use renderer::ExampleKind;

/// Open the window and render until it is closed.
pub fn run(config: ViewerConfig) -> Result<()> {
    // Default control flow (Wait): redraw requests alone keep frames coming.
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

    let mut app = ViewerApp::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("Event loop error: {e:?}"))?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Window + GPU + scene, created on the first `resumed`.
struct Viewer {
    window: Arc<Window>,
    gpu: GpuState,
    scene: Box<dyn Scene>,
}

struct ViewerApp {
    config: ViewerConfig,
    viewer: Option<Viewer>,
    clock: FrameClock,
    fps: FpsCounter,
    fatal: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            viewer: None,
            clock: FrameClock::new(),
            fps: FpsCounter::default(),
            fatal: None,
        }
    }

    fn create_viewer(&self, event_loop: &ActiveEventLoop) -> Result<Viewer> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window_title())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let gpu = pollster::block_on(GpuState::new(window.clone(), self.config.gpu_init()))
            .context("GPU initialization failed")?;
        let mut scene = gpu
            .build_scene(self.config.example)
            .with_context(|| format!("failed to build '{}' scene", self.config.example))?;

        if let Some(path) = &self.config.mesh_path {
            let loaded = report_upload(path, upload_mesh(&gpu, scene.as_mut(), path));
            if !loaded {
                log::info!("Continuing without a mesh: drop an .obj file onto the window");
            }
        } else if self.config.example == ExampleKind::Mesh {
            log::info!("No mesh yet: drop an .obj file onto the window");
        } else {
            log::info!("Starting rendering loop");
        }

        Ok(Viewer { window, gpu, scene })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };

        let ft = self.clock.tick();
        if self.config.show_fps {
            if let Some(fps) = self.fps.record(ft.dt) {
                log::info!("FPS: {:.1}", fps);
            }
        }

        match viewer.gpu.render(viewer.scene.as_mut(), ft.elapsed) {
            Ok(()) => {}
            Err(err) if GpuState::is_surface_lost(&err) => {
                log::warn!("Surface {err:?}, reconfiguring");
                viewer.gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow!("GPU out of memory"));
            }
            Err(err) => log::warn!("Skipping frame: {err:?}"),
        }
    }
}

/// Parse an OBJ file and hand it to the scene, keeping the previous mesh on
/// failure.
fn upload_mesh(gpu: &GpuState, scene: &mut dyn Scene, path: &Path) -> Result<()> {
    log::info!("Submitting file {}...", path.display());
    log::info!("Parsing file...");
    let soup = asset::load_obj_from_path(path)?;
    gpu.load_mesh(scene, &soup)
        .with_context(|| format!("failed to upload {}", path.display()))
}

/// Log a failed upload. Returns whether the mesh was loaded.
fn report_upload(path: &Path, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            log::error!("Could not load {}: {err:#}", path.display());
            false
        }
    }
}

fn is_escape_press(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        match self.create_viewer(event_loop) {
            Ok(viewer) => {
                viewer.window.request_redraw();
                self.viewer = Some(viewer);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewer) = &self.viewer {
            viewer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } if is_escape_press(&event) => {
                log::info!("Escape pressed. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(viewer) = self.viewer.as_mut() {
                    log::debug!("Resized: {}x{}", new_size.width, new_size.height);
                    viewer.gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(viewer) = self.viewer.as_mut() {
                    let size = viewer.window.inner_size();
                    log::info!(
                        "Scale factor changed: {:.3}, new_inner_size={}x{}",
                        scale_factor,
                        size.width,
                        size.height
                    );
                    viewer.gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::DroppedFile(path) => {
                if let Some(viewer) = self.viewer.as_mut() {
                    report_upload(&path, upload_mesh(&viewer.gpu, viewer.scene.as_mut(), &path));
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_upload_is_reported_not_propagated() {
        let path = Path::new("does/not/exist.obj");
        let result = asset::load_obj_from_path(path).map(|_| ());
        assert!(result.is_err());
        assert!(!report_upload(path, result));
    }

    #[test]
    fn successful_upload_is_reported_as_loaded() {
        assert!(report_upload(Path::new("mesh.obj"), Ok(())));
    }
}
