//! Entry point for meshview.
//! Logging + CLI: example choice, mesh file, backend, window size.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use platform::{ExampleKind, ViewerConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GpuBackend {
    Auto,
    #[value(alias = "vk")]
    Vulkan,
    #[value(alias = "d3d12")]
    Dx12,
    #[value(alias = "mtl")]
    Metal,
    #[value(aliases = ["opengl", "gles"])]
    Gl,
}

impl GpuBackend {
    fn backends(self) -> wgpu::Backends {
        match self {
            GpuBackend::Auto => wgpu::Backends::all(),
            GpuBackend::Vulkan => wgpu::Backends::VULKAN,
            GpuBackend::Dx12 => wgpu::Backends::DX12,
            GpuBackend::Metal => wgpu::Backends::METAL,
            GpuBackend::Gl => wgpu::Backends::GL,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "meshview", version, about = "Tutorial rendering examples: a coloured quad and an orbiting mesh viewer")]
struct Cli {
    /// Which example to run (quad or mesh)
    #[arg(long, default_value_t = ExampleKind::Quad)]
    example: ExampleKind,

    /// OBJ file to display; implies `--example mesh`
    #[arg(long, value_name = "PATH")]
    mesh: Option<PathBuf>,

    /// GPU backend to request
    #[arg(long, value_enum, default_value_t = GpuBackend::Auto)]
    gpu_backend: GpuBackend,

    /// Initial window size as WIDTHxHEIGHT
    #[arg(long, value_name = "WxH", default_value = "1280x720", value_parser = parse_size)]
    size: (u32, u32),

    /// Log frames per second once a second
    #[arg(long)]
    show_fps: bool,

    /// Prefer an sRGB surface format
    #[arg(long)]
    srgb: bool,
}

impl Cli {
    fn into_config(self) -> ViewerConfig {
        let example = if self.mesh.is_some() {
            ExampleKind::Mesh
        } else {
            self.example
        };
        let (width, height) = self.size;
        ViewerConfig {
            width,
            height,
            backends: self.gpu_backend.backends(),
            example,
            mesh_path: self.mesh,
            show_fps: self.show_fps,
            prefer_srgb: self.srgb,
            ..ViewerConfig::default()
        }
    }
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("bad height '{h}': {e}"))?;
    Ok((w.max(1), h.max(1)))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config();
    log::info!(
        "Starting meshview. Example: {}, backends: {:?}, show_fps={}, window_size={}x{}",
        config.example,
        config.backends,
        config.show_fps,
        config.width,
        config.height
    );

    platform::run(config)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(args: &[&str]) -> ViewerConfig {
        Cli::try_parse_from(std::iter::once("meshview").chain(args.iter().copied()))
            .expect("valid arguments")
            .into_config()
    }

    #[test]
    fn defaults_match_tutorial_window() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.example, ExampleKind::Quad);
        assert_eq!((cfg.width, cfg.height), (1280, 720));
        assert_eq!(cfg.backends, wgpu::Backends::all());
        assert!(!cfg.show_fps);
    }

    #[test]
    fn mesh_path_selects_mesh_example() {
        let cfg = config_from(&["--mesh", "teapot.obj"]);
        assert_eq!(cfg.example, ExampleKind::Mesh);
        assert_eq!(cfg.mesh_path, Some(PathBuf::from("teapot.obj")));
    }

    #[test]
    fn backend_aliases_are_accepted() {
        let cfg = config_from(&["--gpu-backend", "gles", "--size", "640X480", "--show-fps"]);
        assert_eq!(cfg.backends, wgpu::Backends::GL);
        assert_eq!((cfg.width, cfg.height), (640, 480));
        assert!(cfg.show_fps);
    }

    #[test]
    fn size_parser_rejects_garbage() {
        assert!(parse_size("wide").is_err());
        assert!(parse_size("10xtall").is_err());
        assert_eq!(parse_size("0x0"), Ok((1, 1)));
    }

    #[test]
    fn unknown_example_is_a_usage_error() {
        assert!(Cli::try_parse_from(["meshview", "--example", "cube"]).is_err());
    }
}
