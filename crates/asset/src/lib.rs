//! Asset loading/parsers (meshes, textures).
//! OBJ mesh loader producing flat vertex/normal/index arrays for GPU upload,
//! plus RGBA8 texture loading for the cube demo.

pub mod error;
pub mod mesh;
pub mod obj;
pub mod texture;

pub use error::{IndexKind, ObjError};
pub use mesh::{MeshData, MeshVertex};
pub use obj::{LoadOptions, MalformedPolicy, ObjMesh, load_obj, load_obj_into, load_obj_with};
