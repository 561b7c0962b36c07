//! GPU upload of CPU textures.

use asset::texture::{TextureData, TextureFormat};
use wgpu::{Device, Queue, Sampler, TextureView};

use crate::error::RenderError;

pub struct GpuTexture {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    pub view: TextureView,
    pub sampler: Sampler,
}

impl GpuTexture {
    /// Upload an RGBA8 texture (sRGB) with a linear-filtering sampler.
    pub fn upload(
        device: &Device,
        queue: &Queue,
        data: &TextureData,
        label: &str,
    ) -> Result<Self, RenderError> {
        let max = device.limits().max_texture_dimension_2d;
        if !data.is_valid() || data.width > max || data.height > max {
            return Err(RenderError::InvalidTexture {
                width: data.width,
                height: data.height,
                max,
            });
        }

        let format = match data.format {
            TextureFormat::Rgba8 => wgpu::TextureFormat::Rgba8UnormSrgb,
        };
        let size = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(data.bytes_per_pixel() * data.width),
                rows_per_image: Some(data.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::info!("Uploaded texture '{label}' {}x{}", data.width, data.height);
        Ok(Self {
            texture,
            view,
            sampler,
        })
    }
}
