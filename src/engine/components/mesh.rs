use log::debug;

use crate::engine::components::mesh_data::MeshData;
use crate::engine::components::shapes::Shape;
use crate::engine::error::RenderError;
use crate::engine::loaders::image_loader::ImageData;
use crate::engine::rendering::context::{ BufferTarget, DrawContext };
use crate::engine::rendering::handle::{ BufferHandle, TextureHandle };

/// GPU-resident geometry: one buffer per attribute stream plus the index
/// buffer and an optional albedo texture.
///
/// Built once and never modified. Not `Clone`: every mesh exclusively owns
/// its buffers and must be released through [`Mesh::release`] while the
/// context that created it is alive. The default value is the empty mesh.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Mesh {
    positions: BufferHandle,
    normals: BufferHandle,
    tex_coords: Option<BufferHandle>,
    indices: BufferHandle,
    texture: Option<TextureHandle>,
    vertex_count: u32,
    index_count: u32,
}

impl Mesh {
    /// Uploads `data` as-is, plus `texture` when given. On failure every
    /// object created so far is deleted again.
    pub fn upload<C: DrawContext>(ctx: &mut C, data: &MeshData, texture: Option<&ImageData>) -> Result<Self, RenderError> {
        let mut mesh = Self {
            vertex_count: data.vertex_count() as u32,
            index_count: data.index_count() as u32,
            ..Self::default()
        };
        if let Err(e) = mesh.fill(ctx, data, texture) {
            mesh.release(ctx);
            return Err(e);
        }

        debug!(
            "uploaded mesh: {} vertices, {} indices, textured: {}",
            data.vertex_count(),
            data.index_count(),
            mesh.texture.is_some()
        );
        Ok(mesh)
    }

    fn fill<C: DrawContext>(&mut self, ctx: &mut C, data: &MeshData, texture: Option<&ImageData>) -> Result<(), RenderError> {
        self.positions = ctx.create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(&data.positions))?;
        self.normals = ctx.create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(&data.normals))?;
        if let Some(uvs) = &data.tex_coords {
            self.tex_coords = Some(ctx.create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(uvs))?);
        }
        self.indices = ctx.create_buffer(BufferTarget::Index, bytemuck::cast_slice(&data.indices))?;
        if let Some(image) = texture {
            self.texture = Some(ctx.create_texture_rgba8(image.width, image.height, &image.pixels)?);
        }
        Ok(())
    }

    /// Procedural variant: generates normals when missing and moves the
    /// centroid to the origin so the shape pivots about its center.
    pub fn from_mesh_data<C: DrawContext>(ctx: &mut C, mut data: MeshData) -> Result<Self, RenderError> {
        if !data.has_normals() {
            data.compute_normals();
        }
        data.recenter();
        Self::upload(ctx, &data, None)
    }

    pub fn from_shape<C: DrawContext>(ctx: &mut C, shape: Shape) -> Result<Self, RenderError> {
        Self::from_mesh_data(ctx, shape.mesh_data()?)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn positions(&self) -> BufferHandle {
        self.positions
    }

    pub fn normals(&self) -> BufferHandle {
        self.normals
    }

    pub fn tex_coords(&self) -> Option<BufferHandle> {
        self.tex_coords
    }

    pub fn indices(&self) -> BufferHandle {
        self.indices
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some() && self.tex_coords.is_some()
    }

    pub fn is_valid(&self) -> bool {
        self.positions.is_valid() && self.normals.is_valid() && self.indices.is_valid()
    }

    pub fn release<C: DrawContext>(self, ctx: &mut C) {
        for buffer in [Some(self.positions), Some(self.normals), self.tex_coords, Some(self.indices)]
            .into_iter()
            .flatten()
            .filter(|buffer| buffer.is_valid())
        {
            ctx.delete_buffer(buffer);
        }
        if let Some(texture) = self.texture {
            ctx.delete_texture(texture);
        }
    }
}
