//! Renderer setup errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Surface is not supported by the selected adapter")]
    UnsupportedSurface,

    #[error("Shader '{label}' failed to compile:\n{message}")]
    ShaderCompile { label: String, message: String },

    #[error("Pipeline '{label}' failed to link:\n{message}")]
    PipelineLink { label: String, message: String },

    #[error("Mesh is not drawable ({vertices} vertices, {indices} indices)")]
    InvalidMesh { vertices: usize, indices: usize },

    #[error("Texture {width}x{height} is invalid or exceeds the device limit of {max}")]
    InvalidTexture { width: u32, height: u32, max: u32 },
}
