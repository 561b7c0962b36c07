//! Shader compilation and pipeline creation with validation error capture.
//!
//! wgpu reports invalid WGSL or a mismatched pipeline asynchronously through the
//! device error handler. Each step here runs inside its own validation error
//! scope so a failure comes back as a [`RenderError`] with the compiler log
//! instead of a panic in the uncaptured-error handler.

use wgpu::{Device, ErrorFilter, RenderPipeline, RenderPipelineDescriptor, ShaderModule};

use crate::error::RenderError;

pub const CUBE_WGSL: &str = include_str!("shaders/cube.wgsl");
pub const MESH_WGSL: &str = include_str!("shaders/mesh.wgsl");

/// Run `f` inside a validation error scope and return the captured error, if any.
async fn with_validation<T>(device: &Device, f: impl FnOnce() -> T) -> (T, Option<wgpu::Error>) {
    device.push_error_scope(ErrorFilter::Validation);
    let value = f();
    let error = device.pop_error_scope().await;
    (value, error)
}

/// Compile a WGSL module.
pub async fn create_shader(
    device: &Device,
    label: &str,
    source: &str,
) -> Result<ShaderModule, RenderError> {
    let (module, error) = with_validation(device, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    })
    .await;

    match error {
        None => {
            log::debug!("Compiled shader '{label}'");
            Ok(module)
        }
        Some(err) => Err(RenderError::ShaderCompile {
            label: label.to_owned(),
            message: err.to_string(),
        }),
    }
}

/// Create a render pipeline, surfacing interface mismatches between the
/// vertex layout, bind groups and shader entry points.
pub async fn create_pipeline(
    device: &Device,
    desc: &RenderPipelineDescriptor<'_>,
) -> Result<RenderPipeline, RenderError> {
    let (pipeline, error) = with_validation(device, || device.create_render_pipeline(desc)).await;

    match error {
        None => Ok(pipeline),
        Some(err) => Err(RenderError::PipelineLink {
            label: desc.label.unwrap_or("<unnamed>").to_owned(),
            message: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaders_expose_expected_entry_points_and_bindings() {
        for src in [CUBE_WGSL, MESH_WGSL] {
            assert!(src.contains("fn vs_main"));
            assert!(src.contains("fn fs_main"));
            assert!(src.contains("@group(0) @binding(0)"));
        }
        assert!(CUBE_WGSL.contains("@group(1) @binding(1)"));
    }
}
