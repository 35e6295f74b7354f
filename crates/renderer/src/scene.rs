//! The per-example drawing logic plugged into [`crate::GpuState::render`].

use std::fmt;
use std::str::FromStr;

use asset::TriangleSoup;
use wgpu::{Device, Queue, RenderPass};

use crate::{MeshScene, QuadScene, RenderError, TargetFormats};

/// Timing and surface data a scene needs to update its uniforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInfo {
    /// Seconds since rendering started.
    pub elapsed: f32,
    /// Surface width / height.
    pub aspect: f32,
}

/// One example: owns its pipeline and buffers, issues one draw per frame.
pub trait Scene {
    fn label(&self) -> &'static str;

    /// Write per-frame uniforms. Called before the render pass begins.
    fn update(&mut self, queue: &Queue, frame: &FrameInfo);

    /// Record the draw call into an already-cleared pass.
    fn draw(&self, pass: &mut RenderPass<'_>);

    /// Replace the displayed mesh.
    fn load_mesh(&mut self, _device: &Device, _mesh: &TriangleSoup) -> Result<(), RenderError> {
        Err(RenderError::MeshNotSupported(self.label()))
    }
}

/// Which example to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExampleKind {
    /// Indexed, per-vertex coloured shape in clip space.
    #[default]
    Quad,
    /// User-supplied mesh seen from an orbiting camera.
    Mesh,
}

impl ExampleKind {
    pub fn build(
        self,
        device: &Device,
        targets: TargetFormats,
    ) -> Result<Box<dyn Scene>, RenderError> {
        let scene: Box<dyn Scene> = match self {
            ExampleKind::Quad => Box::new(QuadScene::new(device, targets)?),
            ExampleKind::Mesh => Box::new(MeshScene::new(device, targets)?),
        };
        Ok(scene)
    }
}

impl fmt::Display for ExampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExampleKind::Quad => "quad",
            ExampleKind::Mesh => "mesh",
        })
    }
}

impl FromStr for ExampleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quad" | "01" | "example01" => Ok(ExampleKind::Quad),
            "mesh" | "03" | "example03" => Ok(ExampleKind::Mesh),
            other => Err(format!("unknown example '{other}' (expected quad or mesh)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_names_round_trip_through_display() {
        for kind in [ExampleKind::Quad, ExampleKind::Mesh] {
            assert_eq!(kind.to_string().parse::<ExampleKind>(), Ok(kind));
        }
    }

    #[test]
    fn example_aliases_are_accepted() {
        assert_eq!("Example03".parse::<ExampleKind>(), Ok(ExampleKind::Mesh));
        assert_eq!("01".parse::<ExampleKind>(), Ok(ExampleKind::Quad));
        assert!("cube".parse::<ExampleKind>().is_err());
    }
}
