use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Duration;

use glutin::config::{ Config, ConfigTemplateBuilder };
use glutin::context::{ ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version };
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{ Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface };
use glutin_winit::DisplayBuilder;
use log::{ debug, info };
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ ActiveEventLoop, EventLoop };
use winit::platform::pump_events::{ EventLoopExtPumpEvents, PumpStatus };
use winit::window::{ Window, WindowId };

use crate::engine::config::WindowConfig;
use crate::engine::error::{ PlatformError, RenderError };
use crate::engine::platform::PresentSurface;
use crate::engine::rendering::context::Extent;

#[derive(Default)]
struct WindowEvents {
    close_requested: bool,
}

impl ApplicationHandler for WindowEvents {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            debug!("close requested");
            self.close_requested = true;
        }
    }
}

/// winit window with a current OpenGL 3.3 core context.
///
/// Field order is drop order: surface and context go before the window they
/// render into, the event loop goes last.
pub struct DesktopWindow {
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
    events: WindowEvents,
    event_loop: EventLoop<()>,
    extent: Extent,
}

impl DesktopWindow {
    /// Opens the window and makes its GL context current on this thread.
    pub fn create(config: &WindowConfig) -> Result<(Self, glow::Context), PlatformError> {
        let (Some(width), Some(height)) = (NonZeroU32::new(config.width), NonZeroU32::new(config.height)) else {
            return Err(PlatformError::ZeroExtent {
                width: config.width,
                height: config.height,
            });
        };

        let event_loop = EventLoop::new()?;

        let window_attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(false);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(&event_loop, ConfigTemplateBuilder::new().with_depth_size(24), pick_config)
            .map_err(|e| PlatformError::Display(e.to_string()))?;
        let window = window.ok_or(PlatformError::NoWindow)?;
        let raw_window_handle = window.window_handle()?.as_raw();

        let display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .with_debug(true)
            .build(Some(raw_window_handle));
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes)? };

        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new()
            .build(raw_window_handle, width, height);
        let gl_surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes)? };
        let gl_context = not_current.make_current(&gl_surface)?;

        if config.vsync {
            gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))?;
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|symbol| {
                CString::new(symbol).map_or(std::ptr::null(), |symbol| display.get_proc_address(&symbol))
            })
        };

        info!("created {}x{} window \"{}\"", config.width, config.height, config.title);

        let window = Self {
            gl_surface,
            gl_context,
            window,
            events: WindowEvents::default(),
            event_loop,
            extent: Extent::new(config.width, config.height),
        };
        Ok((window, gl))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

// Most samples wins, like the glutin examples do.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, candidate| {
            if candidate.num_samples() > best.num_samples() { candidate } else { best }
        })
        .expect("glutin always offers at least one config")
}

impl PresentSurface for DesktopWindow {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn poll_events(&mut self) {
        let status = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut self.events);
        if let PumpStatus::Exit(code) = status {
            debug!("event loop exited with code {}", code);
            self.events.close_requested = true;
        }
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .map_err(|e| RenderError::Present(e.to_string()))
    }

    fn should_close(&self) -> bool {
        self.events.close_requested
    }
}
