use std::path::{ Path, PathBuf };

use diffuse_demo::engine::error::AssetError;
use diffuse_demo::engine::loaders::load_model;
use serde_json::{ json, Value };

const POSITIONS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
const NORMALS: [[f32; 3]; 3] = [[0.0, 0.0, 1.0]; 3];
const UVS: [[f32; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
const INDICES: [u16; 3] = [0, 1, 2];

fn blob() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(bytemuck::cast_slice(&POSITIONS));
    bytes.extend_from_slice(bytemuck::cast_slice(&NORMALS));
    bytes.extend_from_slice(bytemuck::cast_slice(&UVS));
    bytes.extend_from_slice(bytemuck::cast_slice(&INDICES));
    bytes
}

fn document(attributes: Value, mode: u32) -> Value {
    json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "uri": "triangle.bin", "byteLength": 102 }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 72, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 96, "byteLength": 6 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC2" },
            { "bufferView": 3, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "meshes": [{
            "primitives": [{ "attributes": attributes, "indices": 3, "mode": mode }]
        }]
    })
}

fn write_asset(dir: &Path, gltf: &Value) -> PathBuf {
    std::fs::write(dir.join("triangle.bin"), blob()).unwrap();
    let path = dir.join("triangle.gltf");
    std::fs::write(&path, serde_json::to_vec_pretty(gltf).unwrap()).unwrap();
    path
}

#[test]
fn loads_every_attribute_from_accessor_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let gltf = document(json!({ "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2 }), 4);
    let mesh = load_model(&write_asset(dir.path(), &gltf)).unwrap();

    assert_eq!(mesh.positions, POSITIONS.to_vec());
    assert_eq!(mesh.normals, NORMALS.to_vec());
    assert_eq!(mesh.tex_coords, Some(UVS.to_vec()));
    assert_eq!(mesh.indices, INDICES.to_vec());
}

#[test]
fn texture_coordinates_are_optional() {
    let dir = tempfile::tempdir().unwrap();
    let gltf = document(json!({ "POSITION": 0, "NORMAL": 1 }), 4);
    let mesh = load_model(&write_asset(dir.path(), &gltf)).unwrap();

    assert_eq!(mesh.tex_coords, None);
    assert_eq!(mesh.vertex_count(), 3);
}

#[test]
fn normals_are_required() {
    let dir = tempfile::tempdir().unwrap();
    let gltf = document(json!({ "POSITION": 0 }), 4);
    let err = load_model(&write_asset(dir.path(), &gltf)).unwrap_err();
    assert!(matches!(err, AssetError::MissingAttribute("NORMAL")));
}

#[test]
fn only_triangle_lists_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let gltf = document(json!({ "POSITION": 0, "NORMAL": 1 }), 1);
    let err = load_model(&write_asset(dir.path(), &gltf)).unwrap_err();
    assert!(matches!(err, AssetError::UnsupportedTopology(gltf::mesh::Mode::Lines)));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(load_model(&dir.path().join("missing.gltf")), Err(AssetError::Gltf(_))));
}
