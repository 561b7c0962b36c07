//! Renderer: wgpu init + depth + one indexed draw per frame.
//! Draws either the textured cube or an OBJ mesh (see [`scene`]).
//! wgpu = 26.x, winit = 0.30.x

pub mod error;
pub mod geometry;
pub mod scene;
pub mod shader;
mod texture;

use std::sync::Arc;
use std::time::Instant;

use wgpu::{
    BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    BlendState, Buffer, BufferBindingType, BufferUsages, ColorTargetState, ColorWrites,
    CommandEncoderDescriptor, DepthBiasState, DepthStencilState, Device, DeviceDescriptor,
    Extent3d, Features, FragmentState, Instance, InstanceDescriptor, Limits, LoadOp, Operations,
    PipelineLayoutDescriptor, PowerPreference, PresentMode, Queue, RenderPassColorAttachment,
    RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor, ShaderModule, ShaderStages,
    StoreOp, Surface, SurfaceConfiguration, SurfaceError, TextureDescriptor, TextureDimension,
    TextureFormat, TextureUsages, TextureView, TextureViewDescriptor, VertexBufferLayout,
    VertexState, util::DeviceExt,
};
use winit::{dpi::PhysicalSize, window::Window};

pub use error::RenderError;
pub use scene::{SceneKind, SceneSetup, SceneUniform};

use geometry::{CubeVertex, MeshGpuVertex};
use texture::GpuTexture;

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Buffers and pipeline for the single drawn object. Uploaded once in
/// [`RenderContext::new`] and never touched again.
struct GpuScene {
    kind: SceneKind,
    pipeline: RenderPipeline,
    vertex_buf: Buffer,
    index_buf: Buffer,
    index_count: u32,
    /// Bound in order as groups 0..n.
    bind_groups: Vec<BindGroup>,
    _texture: Option<GpuTexture>,
}

/// Everything the frame loop needs, owned by the caller instead of living in
/// globals. Dropping it releases all GPU resources.
pub struct RenderContext {
    // Surface
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    scene: GpuScene,
    scene_buf: Buffer,
    start: Instant,

    // Depth
    depth_view: TextureView,

    // Size cache
    width: u32,
    height: u32,
}

impl RenderContext {
    /// Create GPU state bound to an `Arc<Window>` and upload the scene.
    pub async fn new(
        window: Arc<Window>,
        backends: wgpu::Backends,
        setup: SceneSetup,
    ) -> Result<Self, RenderError> {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        // Instance & surface
        let instance = Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance.create_surface(window.clone())?;

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
                label: Some("meshview device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await?;

        // Surface format (prefer sRGB)
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;
        log::info!("Surface format: {:?}", surface_format);

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, &surface_config);

        // ==== Scene UBO (group 0) ====
        let scene_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Scene BGL"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<SceneUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let kind = setup.kind();
        let scene_init = kind.uniform(0.0, width, height);
        let scene_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene UBO"),
            contents: bytemuck::bytes_of(&scene_init),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let scene_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene BG"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buf.as_entire_binding(),
            }],
        });

        let scene =
            build_scene(&device, &queue, surface_format, &scene_bgl, scene_bg, setup).await?;
        log::info!(
            "{:?} scene ready: {} indices ({} triangles)",
            scene.kind,
            scene.index_count,
            scene.index_count / 3
        );

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            scene,
            scene_buf,
            start: Instant::now(),
            depth_view,
            width,
            height,
        })
    }

    pub fn scene_kind(&self) -> SceneKind {
        self.scene.kind
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
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

    /// Render one frame: update MVP, clear to white, draw the scene.
    pub fn render(&mut self) -> Result<(), SurfaceError> {
        let t = self.start.elapsed().as_secs_f32();
        let uniform = self.scene.kind.uniform(t, self.width, self.height);
        self.queue
            .write_buffer(&self.scene_buf, 0, bytemuck::bytes_of(&uniform));

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&Default::default());

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
                        load: LoadOp::Clear(wgpu::Color::WHITE),
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

            rpass.set_pipeline(&self.scene.pipeline);
            for (group, bg) in self.scene.bind_groups.iter().enumerate() {
                rpass.set_bind_group(group as u32, bg, &[]);
            }
            rpass.set_vertex_buffer(0, self.scene.vertex_buf.slice(..));
            rpass.set_index_buffer(self.scene.index_buf.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..self.scene.index_count, 0, 0..1);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }
}

async fn build_scene(
    device: &Device,
    queue: &Queue,
    format: TextureFormat,
    scene_bgl: &BindGroupLayout,
    scene_bg: BindGroup,
    setup: SceneSetup,
) -> Result<GpuScene, RenderError> {
    match setup {
        SceneSetup::TexturedCube { texture } => {
            let gpu_texture = GpuTexture::upload(device, queue, &texture, "Cube texture")?;
            let texture_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: Some("Cube texture BGL"),
                entries: &[
                    BindGroupLayoutEntry {
                        binding: 0,
                        visibility: ShaderStages::FRAGMENT,
                        ty: BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    BindGroupLayoutEntry {
                        binding: 1,
                        visibility: ShaderStages::FRAGMENT,
                        ty: BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });
            let texture_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Cube texture BG"),
                layout: &texture_bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&gpu_texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&gpu_texture.sampler),
                    },
                ],
            });

            let module = shader::create_shader(device, "cube.wgsl", shader::CUBE_WGSL).await?;
            let pipeline = create_scene_pipeline(
                device,
                "Cube Pipeline",
                &module,
                CubeVertex::LAYOUT,
                &[scene_bgl, &texture_bgl],
                format,
            )
            .await?;

            // ==== Geometry: indexed cube ====
            let (vertices, indices) = geometry::cube_vertices();
            let vertex_buf = create_buffer(device, "Cube VB", &vertices, BufferUsages::VERTEX);
            let index_buf = create_buffer(device, "Cube IB", &indices, BufferUsages::INDEX);
            Ok(GpuScene {
                kind: SceneKind::Cube,
                pipeline,
                vertex_buf,
                index_buf,
                index_count: indices.len() as u32,
                bind_groups: vec![scene_bg, texture_bg],
                _texture: Some(gpu_texture),
            })
        }
        SceneSetup::Mesh { mesh } => {
            let invalid = || RenderError::InvalidMesh {
                vertices: mesh.vertices.len(),
                indices: mesh.indices.len(),
            };
            if !mesh.is_valid() {
                return Err(invalid());
            }
            let index_count = u32::try_from(mesh.indices.len()).map_err(|_| invalid())?;

            let module = shader::create_shader(device, "mesh.wgsl", shader::MESH_WGSL).await?;
            let pipeline = create_scene_pipeline(
                device,
                "Mesh Pipeline",
                &module,
                MeshGpuVertex::LAYOUT,
                &[scene_bgl],
                format,
            )
            .await?;

            let vertices = geometry::mesh_vertices(&mesh);
            let vertex_buf = create_buffer(device, "Mesh VB", &vertices, BufferUsages::VERTEX);
            let index_buf = create_buffer(device, "Mesh IB", &mesh.indices, BufferUsages::INDEX);
            Ok(GpuScene {
                kind: SceneKind::Mesh,
                pipeline,
                vertex_buf,
                index_buf,
                index_count,
                bind_groups: vec![scene_bg],
                _texture: None,
            })
        }
    }
}

async fn create_scene_pipeline(
    device: &Device,
    label: &str,
    module: &ShaderModule,
    vertex_layout: VertexBufferLayout<'static>,
    bind_group_layouts: &[&BindGroupLayout],
    format: TextureFormat,
) -> Result<RenderPipeline, RenderError> {
    let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    let buffers = [vertex_layout];
    let targets = [Some(ColorTargetState {
        format,
        blend: Some(BlendState::ALPHA_BLENDING),
        write_mask: ColorWrites::ALL,
    })];
    let desc = RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &targets,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        // OBJ winding is not guaranteed, so nothing is culled.
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    };
    shader::create_pipeline(device, &desc).await
}

fn create_buffer<T: bytemuck::Pod>(
    device: &Device,
    label: &str,
    data: &[T],
    usage: BufferUsages,
) -> Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage,
    })
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
