use bytemuck::{Pod, Zeroable};
use tdmath::Vector3;

/// A single vertex read back out of a `Model`. `uv.z` is always zero.
#[derive(Debug)]
pub struct Vertex {
    pub p: Vector3,
    pub uv: Vector3,
    pub normal: Vector3,
}

/// Interleaved vertex layout for a single GPU vertex buffer.
///
/// 32 bytes: position (12), texture coordinate (8), normal (12).
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub texture_coordinate: [f32; 2],
    pub normal: [f32; 3],
}

/// A loaded mesh as parallel flat arrays, ready for upload.
///
/// Vertex `i` occupies `positions[3i..3i + 3]`, `texture_coordinates[2i..2i + 2]`
/// and `normals[3i..3i + 3]`. Every entry of `indices` is a vertex number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub name: String,
    pub positions: Vec<f32>,
    pub texture_coordinates: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    /// Largest distance of any vertex from the origin.
    pub furthest_point: f32,
    /// Number of `v` records in the source.
    pub position_count: usize,
}

impl Model {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertices created by splitting positions along seams.
    pub fn split_vertex_count(&self) -> usize {
        self.vertex_count().saturating_sub(self.position_count)
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn vertex(&self, i: usize) -> Option<Vertex> {
        let gpu = self.gpu_vertex(i)?;
        let [x, y, z] = gpu.position;
        let [u, v] = gpu.texture_coordinate;
        let [nx, ny, nz] = gpu.normal;

        Some(Vertex {
            p: Vector3::new(x, y, z),
            uv: Vector3::new(u, v, 0.0),
            normal: Vector3::new(nx, ny, nz),
        })
    }

    pub fn gpu_vertex(&self, i: usize) -> Option<GpuVertex> {
        if i >= self.vertex_count() {
            return None;
        }

        let p = &self.positions[i * 3..i * 3 + 3];
        let t = &self.texture_coordinates[i * 2..i * 2 + 2];
        let n = &self.normals[i * 3..i * 3 + 3];

        Some(GpuVertex {
            position: [p[0], p[1], p[2]],
            texture_coordinate: [t[0], t[1]],
            normal: [n[0], n[1], n[2]],
        })
    }

    pub fn interleaved(&self) -> Vec<GpuVertex> {
        (0..self.vertex_count())
            .filter_map(|i| self.gpu_vertex(i))
            .collect()
    }

    /// The interleaved vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.interleaved()).to_vec()
    }

    /// The index buffer as raw bytes (native-endian `u32`).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
