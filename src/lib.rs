//! Minimal OpenGL demo: a lit cube, a light marker sphere and a textured
//! glTF model drawn every frame with one diffuse shader.

pub mod engine;

pub use engine::components::{ Mesh, MeshData, Shape, Transform };
pub use engine::rendering::{ DrawContext, DrawMode, Renderer, ShaderProgram };
