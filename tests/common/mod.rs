//! Recording stand-ins for the GPU and the window.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{ HashMap, HashSet };
use std::rc::Rc;

use diffuse_demo::engine::error::RenderError;
use diffuse_demo::engine::platform::PresentSurface;
use diffuse_demo::engine::rendering::context::{ BufferTarget, DrawContext, Extent, GpuDiagnostic, ShaderStage };
use diffuse_demo::engine::rendering::handle::{ BufferHandle, ProgramHandle, ShaderHandle, TextureHandle, UniformLocation };
use diffuse_demo::engine::utils::math::{ Mat4x4, Vec3 };

/// Shader sources containing this line fail to compile.
pub const COMPILE_ERROR_MARKER: &str = "#error mock";

/// Buffer bytes back to vectors. Recorded bytes carry no alignment guarantee.
pub fn read_vec3s(bytes: &[u8]) -> Vec<[f32; 3]> {
    bytes.chunks_exact(12).map(bytemuck::pod_read_unaligned::<[f32; 3]>).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
    Matrix(Mat4x4),
    Vector(Vec3),
    Int(i32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawCall {
    pub program: ProgramHandle,
    pub index_buffer: BufferHandle,
    pub index_count: u32,
    pub attributes: Vec<(u32, BufferHandle, i32)>,
    pub texture: Option<TextureHandle>,
}

#[derive(Debug, Default)]
pub struct Recording {
    next_name: u32,
    pub pipeline: Option<Extent>,
    pub clears: usize,

    buffers_requested: usize,
    /// 1-based `create_buffer` call that fails.
    pub fail_buffer_at: Option<usize>,
    pub fail_textures: bool,
    pub buffers: HashMap<BufferHandle, (BufferTarget, Vec<u8>)>,
    pub deleted_buffers: Vec<BufferHandle>,
    pub textures: HashMap<TextureHandle, (u32, u32)>,
    pub deleted_textures: Vec<TextureHandle>,

    pub shaders: HashMap<ShaderHandle, bool>,
    pub deleted_shaders: Vec<ShaderHandle>,
    pub programs: HashSet<ProgramHandle>,
    pub deleted_programs: Vec<ProgramHandle>,
    pub attached: HashMap<ProgramHandle, Vec<ShaderHandle>>,
    pub detached: Vec<(ProgramHandle, ShaderHandle)>,
    pub linked: HashSet<ProgramHandle>,
    pub fail_link: bool,

    pub current_program: ProgramHandle,
    uniform_names: Vec<String>,
    /// Every uniform write, by name, in call order.
    pub uniform_writes: Vec<(String, UniformValue)>,

    pub index_buffer: BufferHandle,
    pub attributes: HashMap<u32, (BufferHandle, i32)>,
    pub texture_unit0: Option<TextureHandle>,
    pub draws: Vec<DrawCall>,

    pub pending_diagnostics: Vec<GpuDiagnostic>,
}

impl Recording {
    fn name(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }

    pub fn writes_to(&self, name: &str) -> Vec<UniformValue> {
        self.uniform_writes
            .iter()
            .filter(|(written, _)| written == name)
            .map(|(_, value)| value.clone())
            .collect()
    }

    pub fn last_write(&self, name: &str) -> Option<UniformValue> {
        self.writes_to(name).pop()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    fn write(&mut self, location: UniformLocation, value: UniformValue) {
        let name = self.uniform_names[location.raw() as usize].clone();
        self.uniform_writes.push((name, value));
    }
}

#[derive(Clone, Default)]
pub struct MockContext {
    pub recording: Rc<RefCell<Recording>>,
}

impl MockContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_link() -> Self {
        let ctx = Self::default();
        ctx.recording.borrow_mut().fail_link = true;
        ctx
    }

    pub fn failing_buffer(call: usize) -> Self {
        let ctx = Self::default();
        ctx.recording.borrow_mut().fail_buffer_at = Some(call);
        ctx
    }

    pub fn failing_textures() -> Self {
        let ctx = Self::default();
        ctx.recording.borrow_mut().fail_textures = true;
        ctx
    }

    pub fn push_diagnostic(&self, id: u32, message: &str) {
        self.recording.borrow_mut().pending_diagnostics.push(GpuDiagnostic {
            id,
            severity: 0x9146,
            message: message.to_string(),
        });
    }
}

impl DrawContext for MockContext {
    fn init_pipeline(&mut self, extent: Extent) {
        self.recording.borrow_mut().pipeline = Some(extent);
    }

    fn clear(&mut self) {
        self.recording.borrow_mut().clears += 1;
    }

    fn create_buffer(&mut self, target: BufferTarget, data: &[u8]) -> Result<BufferHandle, RenderError> {
        let mut rec = self.recording.borrow_mut();
        rec.buffers_requested += 1;
        if rec.fail_buffer_at == Some(rec.buffers_requested) {
            return Err(RenderError::Allocation {
                what: "buffer",
                reason: "mock out of memory".to_string(),
            });
        }
        let buffer = BufferHandle::from_raw(rec.name());
        rec.buffers.insert(buffer, (target, data.to_vec()));
        Ok(buffer)
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        let mut rec = self.recording.borrow_mut();
        rec.buffers.remove(&buffer);
        rec.deleted_buffers.push(buffer);
    }

    fn create_texture_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureHandle, RenderError> {
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        let mut rec = self.recording.borrow_mut();
        if rec.fail_textures {
            return Err(RenderError::Allocation {
                what: "texture",
                reason: "mock out of memory".to_string(),
            });
        }
        let texture = TextureHandle::from_raw(rec.name());
        rec.textures.insert(texture, (width, height));
        Ok(texture)
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        let mut rec = self.recording.borrow_mut();
        rec.textures.remove(&texture);
        rec.deleted_textures.push(texture);
    }

    fn create_shader(&mut self, _stage: ShaderStage) -> Result<ShaderHandle, RenderError> {
        let mut rec = self.recording.borrow_mut();
        let shader = ShaderHandle::from_raw(rec.name());
        rec.shaders.insert(shader, false);
        Ok(shader)
    }

    fn compile_shader(&mut self, shader: ShaderHandle, source: &str) -> Result<(), String> {
        let ok = !source.contains(COMPILE_ERROR_MARKER);
        self.recording.borrow_mut().shaders.insert(shader, ok);
        if ok { Ok(()) } else { Err("0:1: mock compile error\n".to_string()) }
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        let mut rec = self.recording.borrow_mut();
        rec.shaders.remove(&shader);
        rec.deleted_shaders.push(shader);
    }

    fn create_program(&mut self) -> Result<ProgramHandle, RenderError> {
        let mut rec = self.recording.borrow_mut();
        let program = ProgramHandle::from_raw(rec.name());
        rec.programs.insert(program);
        Ok(program)
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        self.recording.borrow_mut().attached.entry(program).or_default().push(shader);
    }

    fn detach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        let mut rec = self.recording.borrow_mut();
        if let Some(stages) = rec.attached.get_mut(&program) {
            stages.retain(|&attached| attached != shader);
        }
        rec.detached.push((program, shader));
    }

    fn link_program(&mut self, program: ProgramHandle) -> Result<(), String> {
        let mut rec = self.recording.borrow_mut();
        let stages = rec.attached.get(&program).cloned().unwrap_or_default();
        let compiled = stages.len() == 2 && stages.iter().all(|shader| rec.shaders.get(shader) == Some(&true));
        if rec.fail_link || !compiled {
            return Err("mock link error".to_string());
        }
        rec.linked.insert(program);
        Ok(())
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        let mut rec = self.recording.borrow_mut();
        rec.programs.remove(&program);
        rec.linked.remove(&program);
        rec.deleted_programs.push(program);
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.recording.borrow_mut().current_program = program;
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let mut rec = self.recording.borrow_mut();
        if !rec.linked.contains(&program) {
            return None;
        }
        let index = match rec.uniform_names.iter().position(|known| known == name) {
            Some(index) => index,
            None => {
                rec.uniform_names.push(name.to_string());
                rec.uniform_names.len() - 1
            }
        };
        Some(UniformLocation::from_raw(index as u32))
    }

    fn set_matrix_uniform(&mut self, location: UniformLocation, value: &Mat4x4) {
        self.recording.borrow_mut().write(location, UniformValue::Matrix(*value));
    }

    fn set_vector_uniform(&mut self, location: UniformLocation, value: Vec3) {
        self.recording.borrow_mut().write(location, UniformValue::Vector(value));
    }

    fn set_int_uniform(&mut self, location: UniformLocation, value: i32) {
        self.recording.borrow_mut().write(location, UniformValue::Int(value));
    }

    fn bind_vertex_attribute(&mut self, slot: u32, buffer: BufferHandle, components: i32) {
        self.recording.borrow_mut().attributes.insert(slot, (buffer, components));
    }

    fn disable_vertex_attribute(&mut self, slot: u32) {
        self.recording.borrow_mut().attributes.remove(&slot);
    }

    fn bind_index_buffer(&mut self, buffer: BufferHandle) {
        self.recording.borrow_mut().index_buffer = buffer;
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        assert_eq!(unit, 0);
        self.recording.borrow_mut().texture_unit0 = Some(texture);
    }

    fn draw_indexed_u16(&mut self, index_count: u32) {
        let mut rec = self.recording.borrow_mut();
        let mut attributes: Vec<_> = rec.attributes
            .iter()
            .map(|(&slot, &(buffer, components))| (slot, buffer, components))
            .collect();
        attributes.sort_by_key(|&(slot, _, _)| slot);
        let texture = if rec.attributes.contains_key(&2) { rec.texture_unit0 } else { None };
        let call = DrawCall {
            program: rec.current_program,
            index_buffer: rec.index_buffer,
            index_count,
            attributes,
            texture,
        };
        rec.draws.push(call);
    }

    fn take_diagnostics(&mut self) -> Vec<GpuDiagnostic> {
        std::mem::take(&mut self.recording.borrow_mut().pending_diagnostics)
    }
}

#[derive(Debug, Default)]
pub struct WindowState {
    pub polls: usize,
    pub presents: usize,
    pub close_requested: bool,
    pub dropped: bool,
}

pub struct MockWindow {
    extent: Extent,
    pub state: Rc<RefCell<WindowState>>,
}

impl MockWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            extent: Extent::new(width, height),
            state: Rc::default(),
        }
    }
}

impl PresentSurface for MockWindow {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn poll_events(&mut self) {
        self.state.borrow_mut().polls += 1;
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.state.borrow_mut().presents += 1;
        Ok(())
    }

    fn should_close(&self) -> bool {
        self.state.borrow().close_requested
    }
}

impl Drop for MockWindow {
    fn drop(&mut self) {
        self.state.borrow_mut().dropped = true;
    }
}
