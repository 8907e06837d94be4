//! Error types of the engine.
//!
//! Nothing below `main` aborts the process; callers decide what is fatal.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to allocate {what}: {reason}")]
    Allocation {
        what: &'static str,
        reason: String,
    },

    #[error("uniform `{0}` is not active in the shader program")]
    UniformNotFound(&'static str),

    #[error("shader program failed to compile or link")]
    InvalidShaderProgram,

    #[error("textured draw of a mesh without texture or texture coordinates")]
    MissingTexture,

    #[error("GPU reported error {id}: {message}")]
    Gpu {
        id: u32,
        message: String,
    },

    #[error("{shape} needs {vertex_count} vertices, more than 16-bit indices can address")]
    TooManyVertices {
        shape: String,
        vertex_count: u64,
    },

    #[error("failed to present frame: {0}")]
    Present(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("no mesh primitive found in {0:?}")]
    NoMesh(PathBuf),

    #[error("primitive uses {0:?} topology, only triangle lists are supported")]
    UnsupportedTopology(gltf::mesh::Mode),

    #[error("missing {0} attribute")]
    MissingAttribute(&'static str),

    #[error("accessor {0} has no buffer view")]
    MissingBufferView(usize),

    #[error("buffer {0} is not loaded")]
    MissingBuffer(usize),

    #[error("accessor {0} is sparse, which is not supported")]
    SparseAccessor(usize),

    #[error("accessor reads bytes {start}..{end} of a {len} byte buffer")]
    AccessorOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("{attribute} expects {expected}, accessor holds {found}")]
    UnexpectedLayout {
        attribute: &'static str,
        expected: String,
        found: String,
    },

    #[error("index {0} does not fit in 16 bits")]
    IndexOverflow(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("no suitable GL display configuration: {0}")]
    Display(String),

    #[error("display builder did not create a window")]
    NoWindow,

    #[error("window handle unavailable: {0}")]
    Handle(#[from] raw_window_handle::HandleError),

    #[error("OpenGL context error: {0}")]
    Glutin(#[from] glutin::error::Error),

    #[error("window extent must be non-zero, got {width}x{height}")]
    ZeroExtent {
        width: u32,
        height: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
