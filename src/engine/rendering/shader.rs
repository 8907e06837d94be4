use log::{ debug, error };

use crate::engine::error::RenderError;
use crate::engine::rendering::context::{ DrawContext, ShaderStage };
use crate::engine::rendering::handle::{ ProgramHandle, ShaderHandle, UniformLocation };
use crate::engine::utils::math::{ Mat4x4, Vec3 };

pub const DIFFUSE_VERTEX_SHADER: &str = include_str!("../../assets/shaders/vertex_diffuse.glsl");
pub const DIFFUSE_FRAGMENT_SHADER: &str = include_str!("../../assets/shaders/fragment_diffuse.glsl");

/// Uniform names shared with the embedded GLSL.
pub mod uniforms {
    pub const MODEL_MATRIX: &str = "model_matrix";
    pub const NORMAL_MATRIX: &str = "normal_matrix";
    pub const PROJECTION_MATRIX: &str = "projection_matrix";
    pub const LIGHT_SOURCE: &str = "light_source";
    pub const COLOR: &str = "color";
    pub const MODE: &str = "mode";
    pub const ALBEDO_TEXTURE: &str = "albedo_texture";
}

/// Vertex attribute slots used by the embedded GLSL.
pub mod slots {
    pub const POSITION: u32 = 0;
    pub const NORMAL: u32 = 1;
    pub const TEX_COORD: u32 = 2;
}

/// A linked GPU program.
///
/// Building never fails outright: compile and link problems are logged and
/// leave the handle at [`ProgramHandle::INVALID`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShaderProgram {
    handle: ProgramHandle,
}

impl ShaderProgram {
    pub fn invalid() -> Self {
        Self {
            handle: ProgramHandle::INVALID,
        }
    }

    /// Program with the three draw modes of the demo.
    pub fn diffuse<C: DrawContext>(ctx: &mut C) -> Self {
        Self::compile(ctx, DIFFUSE_VERTEX_SHADER, DIFFUSE_FRAGMENT_SHADER)
    }

    /// Compiles both stages, links them and releases the stage objects.
    /// A failed stage is still attached so the link reports the failure too.
    pub fn compile<C: DrawContext>(ctx: &mut C, vertex_source: &str, fragment_source: &str) -> Self {
        let program = match ctx.create_program() {
            Ok(program) => program,
            Err(e) => {
                error!("shader program creation failed: {}", e);
                return Self::invalid();
            }
        };

        let stages: Vec<ShaderHandle> = [
            (ShaderStage::Vertex, vertex_source),
            (ShaderStage::Fragment, fragment_source),
        ]
            .into_iter()
            .filter_map(|(stage, source)| compile_stage(ctx, stage, source))
            .collect();

        for &stage in &stages {
            ctx.attach_shader(program, stage);
        }

        let linked = ctx.link_program(program);

        for &stage in &stages {
            ctx.detach_shader(program, stage);
            ctx.delete_shader(stage);
        }

        match linked {
            Ok(()) => {
                debug!("linked shader program {}", program.raw());
                Self { handle: program }
            }
            Err(log) => {
                error!("shader linking failed: {}", log.trim_end());
                ctx.delete_program(program);
                Self::invalid()
            }
        }
    }

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }

    pub fn bind<C: DrawContext>(&self, ctx: &mut C) {
        ctx.use_program(self.handle);
    }

    fn location<C: DrawContext>(&self, ctx: &C, name: &'static str) -> Result<UniformLocation, RenderError> {
        ctx.uniform_location(self.handle, name).ok_or(RenderError::UniformNotFound(name))
    }

    /// The program must be bound.
    pub fn set_matrix_uniform<C: DrawContext>(&self, ctx: &mut C, name: &'static str, value: &Mat4x4) -> Result<(), RenderError> {
        let location = self.location(ctx, name)?;
        ctx.set_matrix_uniform(location, value);
        Ok(())
    }

    pub fn set_vector_uniform<C: DrawContext>(&self, ctx: &mut C, name: &'static str, value: Vec3) -> Result<(), RenderError> {
        let location = self.location(ctx, name)?;
        ctx.set_vector_uniform(location, value);
        Ok(())
    }

    pub fn set_int_uniform<C: DrawContext>(&self, ctx: &mut C, name: &'static str, value: i32) -> Result<(), RenderError> {
        let location = self.location(ctx, name)?;
        ctx.set_int_uniform(location, value);
        Ok(())
    }

    pub fn release<C: DrawContext>(self, ctx: &mut C) {
        if self.is_valid() {
            ctx.delete_program(self.handle);
        }
    }
}

// Logs and keeps going on compile errors; only a missing shader object is skipped.
fn compile_stage<C: DrawContext>(ctx: &mut C, stage: ShaderStage, source: &str) -> Option<ShaderHandle> {
    let shader = match ctx.create_shader(stage) {
        Ok(shader) => shader,
        Err(e) => {
            error!("{:?} shader creation failed: {}", stage, e);
            return None;
        }
    };

    if let Err(log) = ctx.compile_shader(shader, source) {
        error!("{:?} shader compiling failed: {}", stage, log.trim_end());
    }
    Some(shader)
}
