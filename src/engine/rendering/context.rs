use crate::engine::error::RenderError;
use crate::engine::rendering::handle::{
    BufferHandle, ProgramHandle, ShaderHandle, TextureHandle, UniformLocation,
};
use crate::engine::utils::math::{ Mat4x4, Vec3 };

/// Framebuffer size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        (self.width as f32) / (self.height as f32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferTarget {
    Vertex,
    Index,
}

/// Message delivered by the driver's debug output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GpuDiagnostic {
    pub id: u32,
    pub severity: u32,
    pub message: String,
}

/// The explicit draw context every GPU operation goes through.
///
/// Binding state (program, attribute slots, texture unit 0) is global to the
/// context and is never restored between calls.
pub trait DrawContext {
    /// Depth testing, alpha blending, viewport and debug output.
    fn init_pipeline(&mut self, extent: Extent);

    fn clear(&mut self);

    /// Immutable buffer initialized with `data`.
    fn create_buffer(&mut self, target: BufferTarget, data: &[u8]) -> Result<BufferHandle, RenderError>;
    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// 2D RGBA8 texture initialized with `pixels`, tightly packed rows.
    fn create_texture_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureHandle, RenderError>;
    fn delete_texture(&mut self, texture: TextureHandle);

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderHandle, RenderError>;
    /// Compiles `source` into `shader`; `Err` carries the info log.
    fn compile_shader(&mut self, shader: ShaderHandle, source: &str) -> Result<(), String>;
    fn delete_shader(&mut self, shader: ShaderHandle);

    fn create_program(&mut self) -> Result<ProgramHandle, RenderError>;
    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle);
    fn detach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle);
    /// `Err` carries the info log.
    fn link_program(&mut self, program: ProgramHandle) -> Result<(), String>;
    fn delete_program(&mut self, program: ProgramHandle);
    fn use_program(&mut self, program: ProgramHandle);

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;
    fn set_matrix_uniform(&mut self, location: UniformLocation, value: &Mat4x4);
    fn set_vector_uniform(&mut self, location: UniformLocation, value: Vec3);
    fn set_int_uniform(&mut self, location: UniformLocation, value: i32);

    /// Tightly packed f32 stream with `components` values per vertex.
    fn bind_vertex_attribute(&mut self, slot: u32, buffer: BufferHandle, components: i32);
    fn disable_vertex_attribute(&mut self, slot: u32);
    fn bind_index_buffer(&mut self, buffer: BufferHandle);
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    /// Indexed triangle list with u16 indices from the bound index buffer.
    fn draw_indexed_u16(&mut self, index_count: u32);

    /// Drains diagnostics collected since the last call.
    fn take_diagnostics(&mut self) -> Vec<GpuDiagnostic>;
}
