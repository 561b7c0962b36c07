//! Demo scenes: what gets uploaded and where the camera sits.

use asset::{mesh::MeshData, texture::TextureData};
use bytemuck::{Pod, Zeroable};
use corelib::{Vec3, camera::Camera, transform::Transform, vec3};

/// Cube spin about the X axis, degrees per second.
pub const CUBE_SPIN_DEG_PER_SEC: f32 = 50.0;

/// CPU data handed to [`crate::RenderContext::new`]; uploaded once.
#[derive(Clone, Debug)]
pub enum SceneSetup {
    TexturedCube { texture: TextureData },
    Mesh { mesh: MeshData },
}

impl SceneSetup {
    pub fn kind(&self) -> SceneKind {
        match self {
            SceneSetup::TexturedCube { .. } => SceneKind::Cube,
            SceneSetup::Mesh { .. } => SceneKind::Mesh,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneKind {
    Cube,
    Mesh,
}

/// Scene UBO (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniform {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

impl SceneKind {
    pub fn camera(self) -> Camera {
        match self {
            SceneKind::Cube => Camera::look_at(vec3(0.0, 2.0, 0.0), vec3(0.0, 0.0, -4.0)),
            SceneKind::Mesh => Camera::look_at(vec3(-3.0, 2.0, 4.0), Vec3::ZERO),
        }
    }

    /// Model transform `t_secs` seconds after start. Both scenes sit 4 units
    /// down -Z; only the cube animates.
    pub fn model(self, t_secs: f32) -> Transform {
        let base = Transform::from_translation(vec3(0.0, 0.0, -4.0));
        match self {
            SceneKind::Cube => base.with_rotation_x((CUBE_SPIN_DEG_PER_SEC * t_secs).to_radians()),
            SceneKind::Mesh => base,
        }
    }

    pub fn uniform(self, t_secs: f32, width: u32, height: u32) -> SceneUniform {
        let model = self.model(t_secs).matrix();
        let mvp = self.camera().with_viewport(width, height).proj_view() * model;
        SceneUniform {
            mvp: mvp.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{Mat4, Vec4};

    #[test]
    fn uniform_is_finite_for_both_scenes() {
        for kind in [SceneKind::Cube, SceneKind::Mesh] {
            let u = kind.uniform(1.5, 800, 600);
            assert!(u.mvp.iter().flatten().all(|f| f.is_finite()));
        }
    }

    #[test]
    fn cube_turns_fifty_degrees_per_second() {
        let r0 = SceneKind::Cube.model(0.0).rotation_euler.x;
        let r1 = SceneKind::Cube.model(1.0).rotation_euler.x;
        assert!(r0.abs() < 1e-6);
        assert!((r1 - 50f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn mesh_is_static() {
        assert_eq!(SceneKind::Mesh.model(0.0), SceneKind::Mesh.model(10.0));
    }

    #[test]
    fn model_origin_lands_inside_the_clip_volume() {
        for kind in [SceneKind::Cube, SceneKind::Mesh] {
            let u = kind.uniform(0.0, 800, 600);
            let clip = Mat4::from_cols_array_2d(&u.mvp) * Vec4::W;
            let ndc = clip / clip.w;
            assert!(clip.w > 0.0, "{kind:?} origin behind the camera");
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "{kind:?}: {ndc:?}");
            assert!(ndc.z >= 0.0 && ndc.z <= 1.0, "{kind:?}: {ndc:?}");
        }
    }

    #[test]
    fn setup_reports_its_kind() {
        let setup = SceneSetup::TexturedCube {
            texture: TextureData::create_test_texture(8),
        };
        assert_eq!(setup.kind(), SceneKind::Cube);
    }
}
