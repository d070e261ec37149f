//! The host render engine.

mod pick;
mod pipelines;
mod rendering;

pub use pick::PickTargetView;

use wgpu::util::DeviceExt;

use framepick_core::PickOptions;

use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};

/// Camera uniforms for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// The host render engine backed by wgpu, headless.
///
/// An off-screen canvas texture stands in for a window surface; cursor
/// coordinates are expressed against its pixel size. The pick render
/// target is created once from [`PickOptions`] and its dimensions never
/// change afterwards.
pub struct Engine {
    /// The wgpu instance.
    pub instance: wgpu::Instance,
    /// The wgpu adapter.
    pub adapter: wgpu::Adapter,
    /// The wgpu device.
    pub device: wgpu::Device,
    /// The wgpu queue.
    pub queue: wgpu::Queue,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Main camera.
    pub camera: Camera,
    /// Background color of normal renders.
    pub background_color: glam::Vec3,
    /// Off-screen canvas color texture.
    pub(crate) canvas_texture: wgpu::Texture,
    /// Canvas color view.
    pub(crate) canvas_view: wgpu::TextureView,
    /// Canvas depth view.
    pub(crate) depth_view: wgpu::TextureView,
    /// Camera uniform buffer.
    pub(crate) camera_buffer: wgpu::Buffer,
    /// Camera bind group (group 0 in both pipelines).
    pub(crate) camera_bind_group: wgpu::BindGroup,
    /// Object bind group layout (group 1 in both pipelines).
    pub(crate) object_bind_group_layout: wgpu::BindGroupLayout,
    /// Forward mesh pipeline.
    pub(crate) mesh_pipeline: wgpu::RenderPipeline,
    /// Replacement pipeline painting encoded pick colors.
    pub(crate) pick_pipeline: wgpu::RenderPipeline,
    /// Pick color texture.
    pub(crate) pick_texture: wgpu::Texture,
    /// Pick color view.
    pub(crate) pick_view: wgpu::TextureView,
    /// Pick depth view.
    pub(crate) pick_depth_view: wgpu::TextureView,
    /// Staging buffer for single-texel pick readback.
    pub(crate) pick_staging_buffer: wgpu::Buffer,
    /// Pick target dimensions.
    pub(crate) pick_size: (u32, u32),
}

impl Engine {
    /// Creates a headless engine with a canvas of the given pixel size.
    pub async fn new(width: u32, height: u32, options: &PickOptions) -> RenderResult<Self> {
        let width = width.max(1);
        let height = height.max(1);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("framepick device"),
                ..Default::default()
            })
            .await?;

        log::info!(
            "engine up: canvas {width}x{height}, pick target {}x{}",
            options.target_width,
            options.target_height
        );

        let canvas_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("canvas texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let canvas_view = canvas_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("canvas depth texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth24Plus,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera uniforms"),
            contents: bytemuck::cast_slice(&[CameraUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("camera bind group layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera bind group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let object_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("object bind group layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let mesh_pipeline = pipelines::create_mesh_pipeline(
            &device,
            &camera_bind_group_layout,
            &object_bind_group_layout,
        );
        let pick_pipeline = pipelines::create_pick_pipeline(
            &device,
            &camera_bind_group_layout,
            &object_bind_group_layout,
        );

        let (pick_texture, pick_view, pick_depth_view, pick_staging_buffer) =
            pick::create_pick_target(&device, options.target_width, options.target_height);

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            width,
            height,
            camera: Camera::new(),
            background_color: options.background_color,
            canvas_texture,
            canvas_view,
            depth_view,
            camera_buffer,
            camera_bind_group,
            object_bind_group_layout,
            mesh_pipeline,
            pick_pipeline,
            pick_texture,
            pick_view,
            pick_depth_view,
            pick_staging_buffer,
            pick_size: (options.target_width.max(1), options.target_height.max(1)),
        })
    }

    /// Canvas size in pixels — the space cursor coordinates live in.
    #[must_use]
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pick target size in texels.
    #[must_use]
    pub fn pick_target_size(&self) -> (u32, u32) {
        self.pick_size
    }
}
