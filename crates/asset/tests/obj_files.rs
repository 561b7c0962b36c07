use std::path::PathBuf;

use asset::{IndexKind, ObjError, load_obj, load_obj_into};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn quad_file_yields_four_vertices_two_triangles() {
    let mesh = load_obj(fixture("quad.obj")).expect("load quad");
    assert_eq!(mesh.vertices.len(), 4);
    assert_eq!(mesh.elements, vec![0, 1, 2, 0, 2, 3]);
    assert!(mesh.normals.is_empty());
}

#[test]
fn cube_file_round_trips_into_gpu_mesh() {
    let mesh = load_obj(fixture("cube.obj")).expect("load cube");
    assert_eq!(mesh.vertices.len(), 8);
    assert_eq!(mesh.normals.len(), 6);
    assert_eq!(mesh.triangle_count(), 12);
    assert!(mesh.elements.iter().all(|&i| (i as usize) < mesh.vertices.len()));

    let data = mesh.to_mesh_data().expect("interleave");
    assert!(data.is_valid());
    // every face has its own normal, so each of the 6 faces needs 4 unique corners
    assert_eq!(data.vertices.len(), 24);
    assert_eq!(data.indices.len(), 36);
}

#[test]
fn crlf_file_parses() {
    let mesh = load_obj(fixture("crlf_triangle.obj")).expect("load crlf");
    assert_eq!(mesh.vertices[1], [1.0, 0.0, 0.0, 2.0]);
    assert_eq!(mesh.elements, vec![0, 1, 2]);
    assert_eq!(mesh.element_normals, vec![Some(0); 3]);
}

#[test]
fn missing_file_is_reported_and_containers_stay_empty() {
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut elements = Vec::new();
    let err = load_obj_into(
        fixture("no_such_mesh.obj"),
        &mut vertices,
        &mut normals,
        &mut elements,
    )
    .unwrap_err();

    assert!(matches!(err, ObjError::FileNotFound { ref path } if path.ends_with("no_such_mesh.obj")));
    assert!(vertices.is_empty());
    assert!(normals.is_empty());
    assert!(elements.is_empty());
}

#[test]
fn malformed_file_leaves_containers_untouched() {
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut elements = Vec::new();
    let err = load_obj_into(
        fixture("bad_vertex.obj"),
        &mut vertices,
        &mut normals,
        &mut elements,
    )
    .unwrap_err();

    assert!(matches!(err, ObjError::MalformedRecord { line: 3, .. }));
    assert!(vertices.is_empty());
    assert!(elements.is_empty());
}

#[test]
fn invalid_utf8_reports_path_and_line() {
    let path = fixture("bad_utf8.obj");
    let err = load_obj(&path).unwrap_err();

    match &err {
        ObjError::Io {
            path: Some(p),
            line: Some(3),
            ..
        } => assert_eq!(p, &path),
        other => panic!("unexpected error: {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("bad_utf8.obj at line 3"), "{msg}");
    assert!(msg.contains("valid UTF-8"), "{msg}");
}

#[test]
fn out_of_range_face_is_rejected() {
    let err = load_obj(fixture("out_of_range.obj")).unwrap_err();
    assert!(matches!(
        err,
        ObjError::IndexOutOfRange {
            line: 4,
            kind: IndexKind::Vertex,
            index: 99,
            ..
        }
    ));
}

#[test]
fn load_into_fills_caller_containers() {
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut elements = Vec::new();
    load_obj_into(fixture("quad.obj"), &mut vertices, &mut normals, &mut elements).unwrap();
    assert_eq!(vertices.len(), 4);
    assert_eq!(elements, vec![0, 1, 2, 0, 2, 3]);

    // a second load appends and keeps indices pointing at its own vertices
    load_obj_into(fixture("quad.obj"), &mut vertices, &mut normals, &mut elements).unwrap();
    assert_eq!(vertices.len(), 8);
    assert_eq!(&elements[6..], &[4, 5, 6, 4, 6, 7]);
}
