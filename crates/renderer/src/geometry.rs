//! GPU vertex layouts and CPU-side geometry for the two demo scenes.

use asset::mesh::{MeshData, MeshVertex};
use bytemuck::{Pod, Zeroable};
use wgpu::{VertexBufferLayout, VertexStepMode};

/// Cube vertex: position + texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

impl CubeVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<CubeVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2],
    };
}

/// Mesh vertex as uploaded: homogeneous position + normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshGpuVertex {
    pub position: [f32; 4],
    pub normal: [f32; 3],
}

impl MeshGpuVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshGpuVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x3],
    };
}

impl From<&MeshVertex> for MeshGpuVertex {
    fn from(v: &MeshVertex) -> Self {
        Self {
            position: v.position,
            normal: v.normal,
        }
    }
}

pub fn mesh_vertices(mesh: &MeshData) -> Vec<MeshGpuVertex> {
    mesh.vertices.iter().map(MeshGpuVertex::from).collect()
}

/// Unit cube with 4 vertices per face so every face maps the full texture.
/// Faces: front, top, back, bottom, left, right (CCW from outside).
pub fn cube_vertices() -> (Vec<CubeVertex>, Vec<u32>) {
    const POSITIONS: [[f32; 3]; 24] = [
        // front z=+1
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
        // top y=+1
        [-1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        // back z=-1
        [1.0, -1.0, -1.0],
        [-1.0, -1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [1.0, 1.0, -1.0],
        // bottom y=-1
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [-1.0, -1.0, 1.0],
        // left x=-1
        [-1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, 1.0, -1.0],
        // right x=+1
        [1.0, -1.0, 1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
    ];
    // texture v runs top to bottom
    const FACE_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let vertices = POSITIONS
        .iter()
        .enumerate()
        .map(|(i, &pos)| CubeVertex {
            pos,
            uv: FACE_UVS[i % 4],
        })
        .collect();

    let indices = (0..6u32)
        .flat_map(|face| {
            let b = face * 4;
            [b, b + 1, b + 2, b + 2, b + 3, b]
        })
        .collect();

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_four_vertices_per_face_and_two_triangles() {
        let (v, i) = cube_vertices();
        assert_eq!(v.len(), 24);
        assert_eq!(i.len(), 36);
        assert!(i.iter().all(|&idx| (idx as usize) < v.len()));
        assert_eq!(&i[..6], &[0, 1, 2, 2, 3, 0]);
        assert_eq!(&i[30..], &[20, 21, 22, 22, 23, 20]);
    }

    #[test]
    fn cube_faces_wind_counter_clockwise_from_outside() {
        let (v, i) = cube_vertices();
        for tri in i.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|k| corelib::Vec3::from(v[k as usize].pos));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn layouts_match_struct_sizes() {
        assert_eq!(CubeVertex::LAYOUT.array_stride, 20);
        assert_eq!(MeshGpuVertex::LAYOUT.array_stride, 28);
    }

    #[test]
    fn mesh_vertices_copy_position_and_normal() {
        let mesh = MeshData::new(
            vec![MeshVertex::new([1.0, 2.0, 3.0, 1.0], [0.0, 1.0, 0.0])],
            vec![0, 0, 0],
        );
        let gpu = mesh_vertices(&mesh);
        assert_eq!(gpu[0].position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(gpu[0].normal, [0.0, 1.0, 0.0]);
    }
}
