use thiserror::Error;

/// Failures while bringing up the GPU or building scene resources.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    /// Shader compilation or pipeline validation failed.
    #[error("{label}: {message}")]
    Shader { label: &'static str, message: String },

    #[error("scene '{0}' does not display meshes")]
    MeshNotSupported(&'static str),

    #[error("mesh is empty or malformed ({vertices} vertices)")]
    InvalidMesh { vertices: usize },
}
