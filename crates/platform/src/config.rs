use std::path::PathBuf;

use renderer::{ExampleKind, GpuInit};

/// Everything the viewer needs to open a window and pick a scene.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub backends: wgpu::Backends,
    pub example: ExampleKind,
    /// Mesh to load on startup. Only meaningful for [`ExampleKind::Mesh`].
    pub mesh_path: Option<PathBuf>,
    /// Log frames per second once a second.
    pub show_fps: bool,
    pub prefer_srgb: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Meshview".to_string(),
            width: 1280,
            height: 720,
            backends: wgpu::Backends::all(),
            example: ExampleKind::default(),
            mesh_path: None,
            show_fps: false,
            prefer_srgb: false,
        }
    }
}

impl ViewerConfig {
    /// Window title including the running example.
    pub fn window_title(&self) -> String {
        format!("{} - {}", self.title, self.example)
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit {
            backends: self.backends,
            prefer_srgb: self.prefer_srgb,
            ..GpuInit::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_runs_quad_example() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.example, ExampleKind::Quad);
        assert!(cfg.mesh_path.is_none());
        assert_eq!(cfg.window_title(), "Meshview - quad");
    }

    #[test]
    fn gpu_init_carries_backend_and_colour_space() {
        let cfg = ViewerConfig {
            backends: wgpu::Backends::GL,
            prefer_srgb: true,
            ..ViewerConfig::default()
        };
        let init = cfg.gpu_init();
        assert_eq!(init.backends, wgpu::Backends::GL);
        assert!(init.prefer_srgb);
    }
}
