mod common;

use common::{ read_vec3s, MockContext };
use diffuse_demo::engine::components::{ Mesh, MeshData, Shape };
use diffuse_demo::engine::error::RenderError;
use diffuse_demo::engine::loaders::ImageData;
use diffuse_demo::engine::rendering::context::BufferTarget;

fn triangle() -> MeshData {
    MeshData::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        vec![[0.0, 0.0, 1.0]; 3],
        Some(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
        vec![0, 1, 2]
    )
}

fn checker() -> ImageData {
    ImageData {
        width: 2,
        height: 1,
        pixels: vec![255, 255, 255, 255, 0, 0, 0, 255],
    }
}

#[test]
fn upload_copies_every_stream_once() {
    let mut ctx = MockContext::new();
    let data = triangle();
    let mesh = Mesh::upload(&mut ctx, &data, Some(&checker())).unwrap();

    assert!(mesh.is_valid());
    assert!(mesh.is_textured());
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.index_count(), 3);

    let rec = ctx.recording.borrow();
    assert_eq!(rec.live_buffers(), 4);
    let (target, bytes) = &rec.buffers[&mesh.indices()];
    assert_eq!(*target, BufferTarget::Index);
    assert_eq!(bytes.as_slice(), bytemuck::cast_slice::<u16, u8>(&data.indices));
    let (target, bytes) = &rec.buffers[&mesh.positions()];
    assert_eq!(*target, BufferTarget::Vertex);
    assert_eq!(bytes.len(), 3 * 3 * 4);
    assert_eq!(rec.textures[&mesh.texture().unwrap()], (2, 1));
}

#[test]
fn same_data_twice_gives_independent_meshes() {
    let mut ctx = MockContext::new();
    let data = triangle();
    let first = Mesh::upload(&mut ctx, &data, None).unwrap();
    let second = Mesh::upload(&mut ctx, &data, None).unwrap();

    assert_eq!(first.vertex_count(), second.vertex_count());
    assert_eq!(first.index_count(), second.index_count());
    let first_buffers = [first.positions(), first.normals(), first.indices(), first.tex_coords().unwrap()];
    let second_buffers = [second.positions(), second.normals(), second.indices(), second.tex_coords().unwrap()];
    assert!(first_buffers.iter().all(|buffer| !second_buffers.contains(buffer)));

    first.release(&mut ctx);
    let rec = ctx.recording.borrow();
    assert_eq!(rec.live_buffers(), 4);
    assert!(second_buffers.iter().all(|buffer| rec.buffers.contains_key(buffer)));
}

#[test]
fn untextured_upload_has_no_texture() {
    let mut ctx = MockContext::new();
    let mut data = triangle();
    data.tex_coords = None;
    let mesh = Mesh::upload(&mut ctx, &data, Some(&checker())).unwrap();

    assert!(mesh.texture().is_some());
    assert!(!mesh.is_textured());
    assert_eq!(ctx.recording.borrow().live_buffers(), 3);
}

#[test]
fn procedural_shapes_are_centered() {
    let mut ctx = MockContext::new();
    for shape in [Shape::Cube, Shape::Sphere { subdivisions: 2 }] {
        let mesh = Mesh::from_shape(&mut ctx, shape).unwrap();
        let rec = ctx.recording.borrow();
        let positions = read_vec3s(&rec.buffers[&mesh.positions()].1);
        assert_eq!(positions.len() as u32, mesh.vertex_count());

        let n = positions.len() as f32;
        for axis in 0..3 {
            let mean = positions.iter().map(|p| p[axis]).sum::<f32>() / n;
            assert!(mean.abs() < 1e-5, "{} mean on axis {} is {}", shape.get_shape_name(), axis, mean);
        }
    }
}

#[test]
fn procedural_mesh_gets_normals() {
    let mut ctx = MockContext::new();
    let mut data = triangle();
    data.normals.clear();
    let mesh = Mesh::from_mesh_data(&mut ctx, data).unwrap();

    let rec = ctx.recording.borrow();
    let normals = read_vec3s(&rec.buffers[&mesh.normals()].1);
    assert_eq!(normals.len(), 3);
    for normal in &normals {
        assert!((normal[2] - 1.0).abs() < 1e-6);
    }
}

#[test]
fn release_frees_buffers_and_texture() {
    let mut ctx = MockContext::new();
    let mesh = Mesh::upload(&mut ctx, &triangle(), Some(&checker())).unwrap();
    mesh.release(&mut ctx);

    let rec = ctx.recording.borrow();
    assert_eq!(rec.live_buffers(), 0);
    assert!(rec.textures.is_empty());
    assert_eq!(rec.deleted_buffers.len(), 4);
    assert_eq!(rec.deleted_textures.len(), 1);
}

#[test]
fn failed_buffer_allocation_leaves_nothing_behind() {
    for call in 1..=4 {
        let mut ctx = MockContext::failing_buffer(call);
        let err = Mesh::upload(&mut ctx, &triangle(), Some(&checker())).unwrap_err();
        assert!(matches!(err, RenderError::Allocation { what: "buffer", .. }));

        let rec = ctx.recording.borrow();
        assert_eq!(rec.live_buffers(), 0, "buffer {} failing", call);
        assert_eq!(rec.deleted_buffers.len(), call - 1);
        assert!(rec.textures.is_empty());
    }
}

#[test]
fn failed_texture_allocation_frees_buffers() {
    let mut ctx = MockContext::failing_textures();
    let err = Mesh::upload(&mut ctx, &triangle(), Some(&checker())).unwrap_err();
    assert!(matches!(err, RenderError::Allocation { what: "texture", .. }));
    assert_eq!(ctx.recording.borrow().live_buffers(), 0);
}
