//! Minimal OBJ parser for single-object meshes.
//!
//! Only `v`, `vn` and `f` records are interpreted; every other directive
//! (`o`/`g`/`s`/`vt`/`mtllib`/`usemtl`/comments) is skipped. Face indices are
//! resolved to 0-based offsets, validated against the data declared so far and
//! fan-triangulated.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::error::{IndexKind, ObjError};
use crate::mesh::{MeshData, MeshVertex};

/// What to do with a `v`/`vn`/`f` record that cannot be parsed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MalformedPolicy {
    /// Fail the whole load with [`ObjError::MalformedRecord`].
    #[default]
    Abort,
    /// Log a warning and drop the offending line.
    Skip,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LoadOptions {
    pub on_malformed: MalformedPolicy,
}

impl LoadOptions {
    pub fn lenient() -> Self {
        Self {
            on_malformed: MalformedPolicy::Skip,
        }
    }
}

/// Flat arrays produced by the loader.
///
/// `vertices` and `elements` alone are enough for an indexed triangle draw.
/// `element_normals` runs parallel to `elements` and records which normal (if
/// any) each triangle corner referenced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjMesh {
    pub vertices: Vec<[f32; 4]>,
    pub normals: Vec<[f32; 3]>,
    pub elements: Vec<u32>,
    pub element_normals: Vec<Option<u32>>,
}

impl ObjMesh {
    pub fn triangle_count(&self) -> usize {
        self.elements.len() / 3
    }

    /// Axis-aligned bounds (min, max) of the xyz components.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.vertices.first()?;
        let init = ([first[0], first[1], first[2]], [first[0], first[1], first[2]]);
        Some(self.vertices.iter().fold(init, |(mut lo, mut hi), v| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(v[axis]);
                hi[axis] = hi[axis].max(v[axis]);
            }
            (lo, hi)
        }))
    }

    /// Build an interleaved mesh with one vertex per distinct
    /// (position index, normal index) pair.
    pub fn to_mesh_data(&self) -> Result<MeshData, ObjError> {
        let mut unique: HashMap<(u32, Option<u32>), u32> = HashMap::new();
        let mut vertices: Vec<MeshVertex> = Vec::new();
        let mut indices: Vec<u32> = Vec::with_capacity(self.elements.len());

        let normal_refs = self
            .element_normals
            .iter()
            .copied()
            .chain(std::iter::repeat(None));
        for (&vi, ni) in self.elements.iter().zip(normal_refs) {
            let index = match unique.get(&(vi, ni)) {
                Some(&idx) => idx,
                None => {
                    let position = self.vertices.get(vi as usize).copied().unwrap_or_default();
                    let normal = ni
                        .and_then(|n| self.normals.get(n as usize).copied())
                        .unwrap_or_default();
                    let idx = u32::try_from(vertices.len()).map_err(|_| {
                        ObjError::TooManyVertices {
                            count: vertices.len(),
                        }
                    })?;
                    vertices.push(MeshVertex::new(position, normal));
                    unique.insert((vi, ni), idx);
                    idx
                }
            };
            indices.push(index);
        }

        Ok(MeshData::new(vertices, indices))
    }
}

/// Load an OBJ mesh from a file path, aborting on the first malformed record.
pub fn load_obj(path: impl AsRef<Path>) -> Result<ObjMesh, ObjError> {
    load_obj_with(path, &LoadOptions::default())
}

/// Load an OBJ mesh from a file path with explicit options.
pub fn load_obj_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<ObjMesh, ObjError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ObjError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ObjError::Io {
            path: Some(path.to_path_buf()),
            line: None,
            source,
        },
    })?;

    let mesh = load_obj_from_reader(BufReader::new(file), options).map_err(|err| match err {
        ObjError::Io {
            path: None,
            line,
            source,
        } => ObjError::Io {
            path: Some(path.to_path_buf()),
            line,
            source,
        },
        other => other,
    })?;

    log::debug!(
        "Loaded OBJ {}: {} vertices, {} normals, {} triangles",
        path.display(),
        mesh.vertices.len(),
        mesh.normals.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Fill caller-owned containers from an OBJ file.
///
/// The containers are only extended once the whole file parsed successfully;
/// on error they are left as they were. Indices are offset by the number of
/// vertices already present so they stay valid offsets into `vertices`.
pub fn load_obj_into(
    path: impl AsRef<Path>,
    vertices: &mut Vec<[f32; 4]>,
    normals: &mut Vec<[f32; 3]>,
    elements: &mut Vec<u32>,
) -> Result<(), ObjError> {
    let mesh = load_obj(path)?;

    let total = vertices.len() + mesh.vertices.len();
    let base = u32::try_from(vertices.len())
        .ok()
        .filter(|_| u32::try_from(total).is_ok())
        .ok_or(ObjError::TooManyVertices { count: total })?;

    vertices.extend(mesh.vertices);
    normals.extend(mesh.normals);
    elements.extend(mesh.elements.into_iter().map(|i| i + base));
    Ok(())
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R, options: &LoadOptions) -> Result<ObjMesh, ObjError> {
    let mut mesh = ObjMesh::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| ObjError::Io {
            path: None,
            line: Some(line_no),
            source,
        })?;

        match parse_line(&mut mesh, &line, line_no) {
            Ok(()) => {}
            Err(err @ ObjError::MalformedRecord { .. })
                if options.on_malformed == MalformedPolicy::Skip =>
            {
                log::warn!("Skipping record: {err}");
            }
            Err(err) => return Err(err),
        }
    }

    if mesh.vertices.len() < 3 || mesh.elements.is_empty() {
        return Err(ObjError::NoGeometry {
            vertices: mesh.vertices.len(),
            triangles: mesh.triangle_count(),
        });
    }

    Ok(mesh)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<ObjMesh, ObjError> {
    load_obj_from_reader(io::Cursor::new(contents), &LoadOptions::default())
}

/// Parse one line. A record is appended only after it parsed completely.
fn parse_line(mesh: &mut ObjMesh, line: &str, line_no: usize) -> Result<(), ObjError> {
    let content = line.split('#').next().unwrap_or_default();
    let mut tokens = content.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(());
    };

    match keyword {
        "v" => {
            let values = parse_floats(tokens, keyword, line_no)?;
            let position = match values.as_slice() {
                &[x, y, z] => [x, y, z, 1.0],
                &[x, y, z, w] => [x, y, z, w],
                // x y z r g b: per-vertex colour extension, colour ignored
                &[x, y, z, _, _, _] => [x, y, z, 1.0],
                other => {
                    return Err(ObjError::malformed(
                        line_no,
                        keyword,
                        format!("expected 3 or 4 coordinates, found {}", other.len()),
                    ));
                }
            };
            mesh.vertices.push(position);
        }
        "vn" => {
            let values = parse_floats(tokens, keyword, line_no)?;
            let &[x, y, z] = values.as_slice() else {
                return Err(ObjError::malformed(
                    line_no,
                    keyword,
                    format!("expected 3 components, found {}", values.len()),
                ));
            };
            mesh.normals.push([x, y, z]);
        }
        "f" => {
            let refs: Vec<&str> = tokens.collect();
            if refs.len() < 3 {
                return Err(ObjError::malformed(
                    line_no,
                    keyword,
                    format!("expected at least 3 vertex references, found {}", refs.len()),
                ));
            }

            let corners = refs
                .iter()
                .map(|token| {
                    parse_face_vertex(token, mesh.vertices.len(), mesh.normals.len(), line_no)
                })
                .collect::<Result<Vec<_>, _>>()?;

            // Triangulate fan
            for tri in 1..(corners.len() - 1) {
                for (vi, ni) in [corners[0], corners[tri], corners[tri + 1]] {
                    mesh.elements.push(vi);
                    mesh.element_normals.push(ni);
                }
            }
        }
        other => {
            log::trace!("Ignoring '{other}' directive on line {line_no}");
        }
    }

    Ok(())
}

fn parse_floats<'a>(
    tokens: impl Iterator<Item = &'a str>,
    keyword: &str,
    line_no: usize,
) -> Result<Vec<f32>, ObjError> {
    tokens
        .map(|token| {
            let value = token.parse::<f32>().map_err(|_| {
                ObjError::malformed(line_no, keyword, format!("invalid number '{token}'"))
            })?;
            if !value.is_finite() {
                return Err(ObjError::malformed(
                    line_no,
                    keyword,
                    format!("non-finite number '{token}'"),
                ));
            }
            Ok(value)
        })
        .collect()
}

/// Parse `v`, `v/vt`, `v//vn` or `v/vt/vn`. A texcoord must be an integer
/// but is otherwise ignored.
fn parse_face_vertex(
    token: &str,
    vertex_count: usize,
    normal_count: usize,
    line_no: usize,
) -> Result<(u32, Option<u32>), ObjError> {
    let mut split = token.split('/');
    let pos = split.next().filter(|s| !s.is_empty()).ok_or_else(|| {
        ObjError::malformed(line_no, "f", format!("missing vertex index in '{token}'"))
    })?;
    let texcoord = split.next().filter(|s| !s.is_empty());
    if let Some(bad) = texcoord.filter(|s| s.parse::<i64>().is_err()) {
        return Err(ObjError::malformed(
            line_no,
            "f",
            format!("invalid texcoord index '{bad}'"),
        ));
    }
    let normal = split.next().filter(|s| !s.is_empty());
    if split.next().is_some() {
        return Err(ObjError::malformed(
            line_no,
            "f",
            format!("too many '/' fields in '{token}'"),
        ));
    }

    let pos_idx = resolve_index(pos, vertex_count, IndexKind::Vertex, line_no)?;
    let norm_idx = normal
        .map(|value| resolve_index(value, normal_count, IndexKind::Normal, line_no))
        .transpose()?;

    Ok((pos_idx, norm_idx))
}

/// Resolve a 1-based (or negative, relative-to-end) index against `len`.
fn resolve_index(token: &str, len: usize, kind: IndexKind, line_no: usize) -> Result<u32, ObjError> {
    let raw = token.parse::<i64>().map_err(|_| {
        ObjError::malformed(line_no, "f", format!("invalid {kind} index '{token}'"))
    })?;
    let out_of_range = || ObjError::IndexOutOfRange {
        line: line_no,
        kind,
        index: raw,
        available: len,
    };

    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let idx = match raw {
        0 => return Err(out_of_range()),
        r if r > 0 => r - 1,
        r => len_i + r,
    };
    if idx < 0 || idx >= len_i {
        return Err(out_of_range());
    }

    u32::try_from(idx).map_err(|_| ObjError::TooManyVertices { count: len })
}
