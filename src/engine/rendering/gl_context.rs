use std::num::NonZeroU32;
use std::sync::{ Arc, Mutex };

use glow::HasContext;
use log::{ debug, error, warn };

use crate::engine::error::RenderError;
use crate::engine::rendering::context::{
    BufferTarget, DrawContext, Extent, GpuDiagnostic, ShaderStage,
};
use crate::engine::rendering::handle::{
    BufferHandle, ProgramHandle, ShaderHandle, TextureHandle, UniformLocation,
};
use crate::engine::utils::math::{ Mat4x4, Vec3 };

/// Driver message ids that are informational on common drivers
/// (buffer placement, shader recompilation, performance hints).
/// Messages of NOTIFICATION severity are suppressed regardless of id,
/// see [`is_suppressed`].
pub const SUPPRESSED_DIAGNOSTICS: [u32; 4] = [131169, 131185, 131218, 131204];

/// Known-benign ids, plus anything the driver itself files as a
/// notification, are only logged. Everything else is queued as an error.
pub fn is_suppressed(id: u32, severity: u32) -> bool {
    SUPPRESSED_DIAGNOSTICS.contains(&id) || severity == glow::DEBUG_SEVERITY_NOTIFICATION
}

fn native<T>(raw: u32, wrap: fn(NonZeroU32) -> T) -> Option<T> {
    NonZeroU32::new(raw).map(wrap)
}

fn allocation(what: &'static str) -> impl FnOnce(String) -> RenderError {
    move |reason| RenderError::Allocation { what, reason }
}

/// [`DrawContext`] backed by a current OpenGL 3.3 core context.
pub struct GlContext {
    gl: glow::Context,
    vao: glow::VertexArray,
    diagnostics: Arc<Mutex<Vec<GpuDiagnostic>>>,
}

impl GlContext {
    /// Wraps a context that is current on the calling thread. Core profile
    /// needs a vertex array bound for attribute state, so one is created here
    /// and stays bound for the lifetime of the context.
    pub fn new(gl: glow::Context) -> Result<Self, RenderError> {
        let vao = unsafe { gl.create_vertex_array() }.map_err(allocation("vertex array"))?;
        unsafe {
            gl.bind_vertex_array(Some(vao));
        }

        Ok(Self {
            gl,
            vao,
            diagnostics: Arc::default(),
        })
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    fn install_debug_output(&mut self) {
        if !self.gl.supports_debug() {
            warn!("GL debug output unavailable, driver errors will not be reported");
            return;
        }

        let sink = Arc::clone(&self.diagnostics);
        unsafe {
            self.gl.enable(glow::DEBUG_OUTPUT);
            self.gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
            self.gl.debug_message_callback(move |_source, _kind, id, severity, message| {
                if is_suppressed(id, severity) {
                    debug!("GL message {}: {}", id, message);
                    return;
                }
                error!("GL error {}: {}", id, message);
                if let Ok(mut queue) = sink.lock() {
                    queue.push(GpuDiagnostic {
                        id,
                        severity,
                        message: message.to_string(),
                    });
                }
            });
            self.gl.debug_message_control(glow::DONT_CARE, glow::DONT_CARE, glow::DONT_CARE, &[], true);
        }
    }
}

impl DrawContext for GlContext {
    fn init_pipeline(&mut self, extent: Extent) {
        unsafe {
            self.gl.viewport(0, 0, extent.width as i32, extent.height as i32);
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.enable(glow::BLEND);
            self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        }
        self.install_debug_output();
    }

    fn clear(&mut self) {
        unsafe {
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn create_buffer(&mut self, target: BufferTarget, data: &[u8]) -> Result<BufferHandle, RenderError> {
        let target = match target {
            BufferTarget::Vertex => glow::ARRAY_BUFFER,
            BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
        };
        unsafe {
            let buffer = self.gl.create_buffer().map_err(allocation("buffer"))?;
            self.gl.bind_buffer(target, Some(buffer));
            self.gl.buffer_data_u8_slice(target, data, glow::STATIC_DRAW);
            Ok(BufferHandle::from_raw(buffer.0.get()))
        }
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if let Some(buffer) = native(buffer.raw(), glow::NativeBuffer) {
            unsafe { self.gl.delete_buffer(buffer) }
        }
    }

    fn create_texture_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureHandle, RenderError> {
        unsafe {
            let texture = self.gl.create_texture().map_err(allocation("texture"))?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels))
            );
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.gl.bind_texture(glow::TEXTURE_2D, None);
            Ok(TextureHandle::from_raw(texture.0.get()))
        }
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        if let Some(texture) = native(texture.raw(), glow::NativeTexture) {
            unsafe { self.gl.delete_texture(texture) }
        }
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderHandle, RenderError> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        let shader = unsafe { self.gl.create_shader(kind) }.map_err(allocation("shader"))?;
        Ok(ShaderHandle::from_raw(shader.0.get()))
    }

    fn compile_shader(&mut self, shader: ShaderHandle, source: &str) -> Result<(), String> {
        let shader = native(shader.raw(), glow::NativeShader).ok_or("invalid shader handle")?;
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                return Err(self.gl.get_shader_info_log(shader));
            }
        }
        Ok(())
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        if let Some(shader) = native(shader.raw(), glow::NativeShader) {
            unsafe { self.gl.delete_shader(shader) }
        }
    }

    fn create_program(&mut self) -> Result<ProgramHandle, RenderError> {
        let program = unsafe { self.gl.create_program() }.map_err(allocation("program"))?;
        Ok(ProgramHandle::from_raw(program.0.get()))
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        if let (Some(program), Some(shader)) =
            (native(program.raw(), glow::NativeProgram), native(shader.raw(), glow::NativeShader))
        {
            unsafe { self.gl.attach_shader(program, shader) }
        }
    }

    fn detach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        if let (Some(program), Some(shader)) =
            (native(program.raw(), glow::NativeProgram), native(shader.raw(), glow::NativeShader))
        {
            unsafe { self.gl.detach_shader(program, shader) }
        }
    }

    fn link_program(&mut self, program: ProgramHandle) -> Result<(), String> {
        let program = native(program.raw(), glow::NativeProgram).ok_or("invalid program handle")?;
        unsafe {
            self.gl.link_program(program);
            if !self.gl.get_program_link_status(program) {
                return Err(self.gl.get_program_info_log(program));
            }
        }
        Ok(())
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if let Some(program) = native(program.raw(), glow::NativeProgram) {
            unsafe { self.gl.delete_program(program) }
        }
    }

    fn use_program(&mut self, program: ProgramHandle) {
        unsafe { self.gl.use_program(native(program.raw(), glow::NativeProgram)) }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let program = native(program.raw(), glow::NativeProgram)?;
        unsafe { self.gl.get_uniform_location(program, name) }
            .map(|location| UniformLocation::from_raw(location.0))
    }

    fn set_matrix_uniform(&mut self, location: UniformLocation, value: &Mat4x4) {
        let location = glow::NativeUniformLocation(location.raw());
        // Mat4x4 is row-major, GL expects columns.
        unsafe { self.gl.uniform_matrix_4_f32_slice(Some(&location), true, value) }
    }

    fn set_vector_uniform(&mut self, location: UniformLocation, value: Vec3) {
        let location = glow::NativeUniformLocation(location.raw());
        unsafe { self.gl.uniform_3_f32(Some(&location), value[0], value[1], value[2]) }
    }

    fn set_int_uniform(&mut self, location: UniformLocation, value: i32) {
        let location = glow::NativeUniformLocation(location.raw());
        unsafe { self.gl.uniform_1_i32(Some(&location), value) }
    }

    fn bind_vertex_attribute(&mut self, slot: u32, buffer: BufferHandle, components: i32) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, native(buffer.raw(), glow::NativeBuffer));
            self.gl.enable_vertex_attrib_array(slot);
            self.gl.vertex_attrib_pointer_f32(slot, components, glow::FLOAT, false, 0, 0);
        }
    }

    fn disable_vertex_attribute(&mut self, slot: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(slot) }
    }

    fn bind_index_buffer(&mut self, buffer: BufferHandle) {
        unsafe {
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, native(buffer.raw(), glow::NativeBuffer));
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, native(texture.raw(), glow::NativeTexture));
        }
    }

    fn draw_indexed_u16(&mut self, index_count: u32) {
        unsafe {
            self.gl.draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_SHORT, 0);
        }
    }

    fn take_diagnostics(&mut self) -> Vec<GpuDiagnostic> {
        self.diagnostics
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

impl Drop for GlContext {
    fn drop(&mut self) {
        unsafe {
            self.gl.bind_vertex_array(None);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benign_ids_are_suppressed_at_any_severity() {
        for id in SUPPRESSED_DIAGNOSTICS {
            assert!(is_suppressed(id, glow::DEBUG_SEVERITY_HIGH));
            assert!(is_suppressed(id, glow::DEBUG_SEVERITY_MEDIUM));
        }
    }

    #[test]
    fn unknown_errors_are_kept() {
        // GL_INVALID_OPERATION as reported by common drivers
        assert!(!is_suppressed(1282, glow::DEBUG_SEVERITY_HIGH));
        assert!(!is_suppressed(1280, glow::DEBUG_SEVERITY_MEDIUM));
        assert!(!is_suppressed(131140, glow::DEBUG_SEVERITY_LOW));
    }

    #[test]
    fn notifications_are_suppressed() {
        assert!(is_suppressed(1282, glow::DEBUG_SEVERITY_NOTIFICATION));
    }
}
