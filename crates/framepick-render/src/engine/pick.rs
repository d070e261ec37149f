//! Pick render target resources and texel readback.

use framepick_core::{ColorTarget, PickError};

use super::Engine;
use crate::error::{RenderError, RenderResult};

/// Creates the pick target: color texture, depth, and the staging buffer
/// single-texel readbacks go through.
pub(crate) fn create_pick_target(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (
    wgpu::Texture,
    wgpu::TextureView,
    wgpu::TextureView,
    wgpu::Buffer,
) {
    let width = width.max(1);
    let height = height.max(1);

    // Rgba8Unorm so the encoded values survive readback exactly.
    let pick_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("pick texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let pick_view = pick_texture.create_view(&wgpu::TextureViewDescriptor::default());

    let pick_depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("pick depth texture"),
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
    let pick_depth_view = pick_depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

    // One texel is 4 bytes; copies must still honor the 256-byte row
    // alignment.
    let pick_staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("pick staging buffer"),
        size: 256,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    (pick_texture, pick_view, pick_depth_view, pick_staging_buffer)
}

impl Engine {
    /// Reads one texel from the pick target.
    ///
    /// `(x, y)` uses the bottom-left origin fixed by
    /// [`framepick_core::ColorTarget`]; the conversion to wgpu's top-down
    /// row layout happens here and nowhere else.
    pub fn read_pick_texel(&self, x: u32, y: u32) -> RenderResult<[u8; 4]> {
        let (width, height) = self.pick_size;
        if x >= width || y >= height {
            return Err(RenderError::ReadbackFailed(format!(
                "texel ({x}, {y}) outside {width}x{height} pick target"
            )));
        }
        let row = height - 1 - y;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pick readback encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.pick_texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y: row, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.pick_staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(256),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = self.pick_staging_buffer.slice(..4);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        let _ = self.device.poll(wgpu::PollType::wait_indefinitely());
        rx.recv()
            .map_err(|_| RenderError::ReadbackFailed("map callback dropped".into()))?
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?;

        let data = buffer_slice.get_mapped_range();
        let pixel = [data[0], data[1], data[2], data[3]];
        drop(data);
        self.pick_staging_buffer.unmap();

        Ok(pixel)
    }

    /// Borrows the pick target as the [`ColorTarget`] the core strategies
    /// read from.
    #[must_use]
    pub fn pick_target_view(&self) -> PickTargetView<'_> {
        PickTargetView { engine: self }
    }
}

/// The pick render target seen through the core [`ColorTarget`] trait.
pub struct PickTargetView<'a> {
    engine: &'a Engine,
}

impl ColorTarget for PickTargetView<'_> {
    fn width(&self) -> u32 {
        self.engine.pick_size.0
    }

    fn height(&self) -> u32 {
        self.engine.pick_size.1
    }

    fn read_texel(&mut self, x: u32, y: u32) -> framepick_core::Result<[u8; 4]> {
        self.engine
            .read_pick_texel(x, y)
            .map_err(|e| PickError::Readback(e.to_string()))
    }
}
