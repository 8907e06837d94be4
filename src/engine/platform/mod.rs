pub mod desktop;

pub use desktop::DesktopWindow;

use crate::engine::error::RenderError;
use crate::engine::rendering::context::Extent;

/// Window and presentation surface the renderer draws into.
pub trait PresentSurface {
    /// Fixed framebuffer size.
    fn extent(&self) -> Extent;

    /// Processes pending OS events without blocking.
    fn poll_events(&mut self);

    /// Swaps the back buffer in. May block on vertical sync.
    fn present(&mut self) -> Result<(), RenderError>;

    /// True once the user asked to close the window.
    fn should_close(&self) -> bool;
}
