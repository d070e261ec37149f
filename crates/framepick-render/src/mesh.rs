//! Mesh geometry and per-node GPU resources.

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

/// CPU-side triangle mesh: positions plus triangle indices.
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Vertex positions in object space.
    pub positions: Vec<Vec3>,
    /// Triangle indices, three per face.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Creates mesh data from raw positions and indices.
    #[must_use]
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// An axis-aligned cube centered at the origin.
    #[must_use]
    pub fn cube(half_extent: f32) -> Self {
        let h = half_extent;
        let positions = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -Z
            4, 5, 6, 4, 6, 7, // +Z
            0, 1, 5, 0, 5, 4, // -Y
            3, 6, 2, 3, 7, 6, // +Y
            1, 2, 6, 1, 6, 5, // +X
            0, 4, 7, 0, 7, 3, // -X
        ];
        Self { positions, indices }
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Per-object uniforms shared by the forward and pick pipelines.
///
/// Layout must match the WGSL `ObjectUniforms` exactly (96 bytes): the
/// forward shader reads `model` and `base_color`, the replacement shader
/// reads `model` and `pick_color`.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    /// Model (object-to-world) transform.
    pub model: [[f32; 4]; 4],
    /// Material base color (RGBA).
    pub base_color: [f32; 4],
    /// Encoded pick color in rgb; alpha unused.
    pub pick_color: [f32; 4],
}

impl Default for ObjectUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            base_color: [0.7, 0.7, 0.7, 1.0],
            pick_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// GPU resources for one mesh node.
pub struct MeshRenderData {
    /// Vertex position buffer (tightly packed `vec3<f32>` attributes).
    pub vertex_buffer: wgpu::Buffer,
    /// Triangle index buffer.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
    /// Object uniform buffer.
    pub uniform_buffer: wgpu::Buffer,
    /// Bind group for the object uniforms (group 1 in both pipelines).
    pub bind_group: wgpu::BindGroup,
}

impl MeshRenderData {
    /// Uploads the mesh and creates its uniform buffer and bind group.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(
        device: &wgpu::Device,
        object_layout: &wgpu::BindGroupLayout,
        mesh: &MeshData,
    ) -> Self {
        let mut positions: Vec<f32> = Vec::with_capacity(mesh.positions.len() * 3);
        for p in &mesh.positions {
            positions.extend_from_slice(&[p.x, p.y, p.z]);
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh vertices"),
            contents: bytemuck::cast_slice(&positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("object uniforms"),
            contents: bytemuck::cast_slice(&[ObjectUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object bind group"),
            layout: object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    /// Uploads this node's current uniform values.
    pub fn write_uniforms(
        &self,
        queue: &wgpu::Queue,
        model: Mat4,
        base_color: [f32; 4],
        pick_color: Vec3,
    ) {
        let uniforms = ObjectUniforms {
            model: model.to_cols_array_2d(),
            base_color,
            pick_color: [pick_color.x, pick_color.y, pick_color.z, 1.0],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_uniforms_layout() {
        // WGSL struct: mat4x4 (64) + vec4 (16) + vec4 (16).
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 96);
    }

    #[test]
    fn test_cube_geometry() {
        let cube = MeshData::cube(0.5);
        assert_eq!(cube.positions.len(), 8);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.indices.iter().all(|&i| (i as usize) < 8));
    }
}
