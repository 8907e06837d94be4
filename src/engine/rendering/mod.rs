pub mod context;
pub mod draw_mode;
pub mod gl_context;
pub mod handle;
pub mod renderer;
pub mod shader;

pub use context::{ DrawContext, Extent };
pub use draw_mode::DrawMode;
pub use gl_context::GlContext;
pub use renderer::{ BuiltinShape, Renderer };
pub use shader::ShaderProgram;
