use std::path::Path;

use gltf::buffer::Data;
use log::info;

use crate::engine::components::mesh_data::MeshData;
use crate::engine::error::AssetError;
use crate::engine::loaders::accessor::{ read_indices, read_vectors, AccessorLayout };

/// Loads the first primitive of the first mesh of a `.gltf`/`.glb` file.
/// External `.bin` buffers are resolved relative to the file.
pub fn load_model(path: &Path) -> Result<MeshData, AssetError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::open(path)?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob)?;

    let mesh = extract_mesh(&document, &buffers, path)?;
    info!(
        "loaded model {:?}: {} vertices, {} indices, uvs: {}",
        path,
        mesh.vertex_count(),
        mesh.index_count(),
        mesh.tex_coords.is_some()
    );
    Ok(mesh)
}

pub fn extract_mesh(document: &gltf::Document, buffers: &[Data], asset: &Path) -> Result<MeshData, AssetError> {
    let primitive = document
        .meshes()
        .next()
        .and_then(|mesh| mesh.primitives().next())
        .ok_or_else(|| AssetError::NoMesh(asset.to_path_buf()))?;

    if primitive.mode() != gltf::mesh::Mode::Triangles {
        return Err(AssetError::UnsupportedTopology(primitive.mode()));
    }

    let positions = read_attribute::<3>(&primitive, buffers, gltf::Semantic::Positions, "POSITION")?
        .ok_or(AssetError::MissingAttribute("POSITION"))?;
    let normals = read_attribute::<3>(&primitive, buffers, gltf::Semantic::Normals, "NORMAL")?
        .ok_or(AssetError::MissingAttribute("NORMAL"))?;
    let tex_coords = read_attribute::<2>(&primitive, buffers, gltf::Semantic::TexCoords(0), "TEXCOORD_0")?;

    let index_accessor = primitive.indices().ok_or(AssetError::MissingAttribute("indices"))?;
    let (layout, buffer) = AccessorLayout::from_gltf(&index_accessor)?;
    let indices = read_indices(buffer_bytes(buffers, buffer)?, &layout)?;

    Ok(MeshData::new(positions, normals, tex_coords, indices))
}

fn read_attribute<const N: usize>(
    primitive: &gltf::Primitive,
    buffers: &[Data],
    semantic: gltf::Semantic,
    name: &'static str
) -> Result<Option<Vec<[f32; N]>>, AssetError>
where
    [f32; N]: bytemuck::Pod,
{
    let Some(accessor) = primitive.get(&semantic) else {
        return Ok(None);
    };
    let (layout, buffer) = AccessorLayout::from_gltf(&accessor)?;
    read_vectors::<N>(name, buffer_bytes(buffers, buffer)?, &layout).map(Some)
}

fn buffer_bytes(buffers: &[Data], index: usize) -> Result<&[u8], AssetError> {
    buffers
        .get(index)
        .map(|data| data.0.as_slice())
        .ok_or(AssetError::MissingBuffer(index))
}
