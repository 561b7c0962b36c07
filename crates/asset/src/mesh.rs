//! CPU-side mesh representation handed to the renderer.

/// Interleaved vertex: homogeneous position plus normal. Values are in object space.
/// A zero normal means "no normal was referenced" and is drawn unlit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 4],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: [f32; 4], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    #[inline]
    pub fn has_normal(&self) -> bool {
        self.normal != [0.0; 3]
    }
}

/// Indexed triangle mesh with tightly-packed vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if the mesh can drive an indexed triangle draw:
    /// non-empty, whole triangles, every index in range.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.indices.is_empty()
            && self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let v = MeshVertex::default();
        let data = MeshData::new(vec![v, v, v], vec![0, 1, 2]);
        assert!(data.is_valid());
        assert_eq!(data.triangle_count(), 1);
    }

    #[test]
    fn out_of_range_or_partial_triangles_are_invalid() {
        let v = MeshVertex::default();
        assert!(!MeshData::new(vec![v, v, v], vec![0, 1, 3]).is_valid());
        assert!(!MeshData::new(vec![v, v, v], vec![0, 1]).is_valid());
        assert!(!MeshData::default().is_valid());
    }

    #[test]
    fn zero_normal_means_unlit() {
        assert!(!MeshVertex::default().has_normal());
        assert!(MeshVertex::new([0.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0]).has_normal());
    }
}
