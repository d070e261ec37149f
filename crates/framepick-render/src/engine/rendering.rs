//! Frame rendering: the forward pass, the deferred pick pass hooks, and
//! texture readback.

use framepick_core::ColorPickPass;

use super::Engine;
use crate::camera::{OutputBinding, ShaderBinding};
use crate::error::RenderResult;
use crate::mesh::MeshRenderData;
use crate::scene::{NodeId, Scene};

impl Engine {
    /// Uploads the camera matrices for the current canvas and viewport.
    pub(crate) fn update_camera_uniforms(&self) {
        let uniforms = super::CameraUniforms {
            view_proj: self
                .camera
                .view_projection_matrix((self.width, self.height))
                .to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Ensures every mesh node has GPU data and uploads its current
    /// uniforms (world transform, base color, pick color).
    pub(crate) fn sync_scene(&self, scene: &mut Scene) {
        for (id, world) in scene.draw_order() {
            let node = scene.node_mut(id);
            if node.render_data.is_none() {
                if let Some(mesh) = node.mesh.as_ref() {
                    let data =
                        MeshRenderData::new(&self.device, &self.object_bind_group_layout, mesh);
                    node.render_data = Some(data);
                }
            }
            if let Some(data) = &node.render_data {
                data.write_uniforms(
                    &self.queue,
                    world,
                    node.base_color.to_array(),
                    node.pick_color,
                );
            }
        }
    }

    /// Encodes one draw pass of the scene through the camera's current
    /// output and shader bindings.
    #[allow(clippy::cast_precision_loss)]
    fn encode_draw_pass(&self, encoder: &mut wgpu::CommandEncoder, scene: &Scene) {
        let output = self.camera.output();
        let shader = self.camera.shader();

        let (color_view, depth_view) = match output {
            OutputBinding::Canvas => (&self.canvas_view, &self.depth_view),
            OutputBinding::PickTarget => (&self.pick_view, &self.pick_depth_view),
        };
        let clear = match output {
            OutputBinding::Canvas => wgpu::Color {
                r: f64::from(self.background_color.x),
                g: f64::from(self.background_color.y),
                b: f64::from(self.background_color.z),
                a: 1.0,
            },
            // Unpainted pick texels must decode to "no object".
            OutputBinding::PickTarget => wgpu::Color::BLACK,
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        if output == OutputBinding::Canvas {
            // Honor the camera's viewport sub-rectangle on the canvas.
            // Pick renders always cover the full target; the viewport
            // contributes its aspect ratio through the projection only,
            // which keeps the cursor-to-texel mapping exact.
            let size = self.camera.viewport.size_on((self.width, self.height));
            if size.x <= 0.0 || size.y <= 0.0 {
                return;
            }
            pass.set_viewport(
                self.camera.viewport.x0 * self.width as f32,
                self.camera.viewport.y0 * self.height as f32,
                size.x,
                size.y,
                0.0,
                1.0,
            );
        }

        let pick_only = shader == ShaderBinding::PickColor;
        pass.set_pipeline(match shader {
            ShaderBinding::Material => &self.mesh_pipeline,
            ShaderBinding::PickColor => &self.pick_pipeline,
        });
        pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for (id, _) in scene.draw_order() {
            let node = scene.node(id);
            if pick_only && !node.pickable {
                continue;
            }
            let Some(data) = &node.render_data else {
                continue;
            };
            pass.set_bind_group(1, &data.bind_group, &[]);
            pass.set_vertex_buffer(0, data.vertex_buffer.slice(..));
            pass.set_index_buffer(data.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..data.index_count, 0, 0..1);
        }
    }

    /// Issues one render of the scene through the camera's current
    /// bindings and waits for submission.
    pub fn render_scene_once(&mut self, scene: &mut Scene) -> RenderResult<()> {
        self.update_camera_uniforms();
        self.sync_scene(scene);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        self.encode_draw_pass(&mut encoder, scene);
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Renders one frame, driving the deferred pick pass hooks.
    ///
    /// The normal scene render always happens. The pick pass contributes
    /// only when armed: its material state resets, ids are assigned per
    /// draw in traversal order, the encoded-color pass executes against
    /// the pick target, and the pending request resolves through
    /// `post_render` — all within this call, after the normal render.
    pub fn render_frame(
        &mut self,
        scene: &mut Scene,
        pick_pass: &mut ColorPickPass<NodeId>,
    ) -> RenderResult<()> {
        self.render_scene_once(scene)?;

        if !pick_pass.pre_render() {
            return Ok(());
        }

        // The swapped material hands out ids in draw order as a side
        // effect of drawing; stash each color on its node and upload
        // before the pass executes.
        for (id, _) in scene.draw_order() {
            let node = scene.node_mut(id);
            if node.pickable && node.mesh.is_some() {
                node.pick_color = pick_pass.assign_color(id);
            }
        }
        self.sync_scene(scene);

        self.camera.bind_pick_output();
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pick pass encoder"),
            });
        self.encode_draw_pass(&mut encoder, scene);
        self.queue.submit(std::iter::once(encoder.finish()));
        self.camera.restore_output();

        let viewport = self.camera.viewport;
        let canvas = (self.width, self.height);
        let mut target = self.pick_target_view();
        pick_pass.post_render(&mut target, viewport, canvas);
        Ok(())
    }

    /// Renders one frame and reads the canvas back as tightly packed
    /// RGBA rows, top-left origin.
    pub fn render_to_image(&mut self, scene: &mut Scene) -> RenderResult<Vec<u8>> {
        self.render_scene_once(scene)?;
        self.read_texture_rgba(&self.canvas_texture, self.width, self.height)
    }

    /// Reads a full RGBA texture back into tightly packed rows.
    pub(crate) fn read_texture_rgba(
        &self,
        texture: &wgpu::Texture,
        width: u32,
        height: u32,
    ) -> RenderResult<Vec<u8>> {
        use crate::error::RenderError;

        let bytes_per_row = (width * 4).div_ceil(256) * 256;
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("texture readback buffer"),
            size: u64::from(bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("texture readback encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::PollType::wait_indefinitely());
        rx.recv()
            .map_err(|_| RenderError::ReadbackFailed("map callback dropped".into()))?
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?;

        let data = slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for row in 0..height {
            let start = (row * bytes_per_row) as usize;
            pixels.extend_from_slice(&data[start..start + (width * 4) as usize]);
        }
        drop(data);
        buffer.unmap();

        Ok(pixels)
    }
}
