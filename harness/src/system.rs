use gl;
use log::{debug, info};
use sdl2;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::video::GLProfile;

use crate::error::HarnessError;
use crate::glutils::log_opengl_info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoEvents {
    /// Window close or any other quit request.
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    /// Anything the harness does not react to.
    Other,
}

fn map_key(keycode: Option<Keycode>) -> Key {
    match keycode {
        Some(Keycode::Escape) => Key::Escape,
        _ => Key::Other,
    }
}

fn map_event(event: Event) -> IoEvents {
    match event {
        Event::Quit { .. } => IoEvents::Quit,
        Event::KeyDown { keycode, .. } => IoEvents::KeyDown(map_key(keycode)),
        Event::KeyUp { keycode, .. } => IoEvents::KeyUp(map_key(keycode)),
        _ => IoEvents::Other,
    }
}

/// The window and the OpenGL context drawing into it.
///
/// Fields drop in declaration order, so the event pump and GL context go
/// before the window, and SDL itself is shut down last.
pub struct RenderContext {
    pub w: u32,
    pub h: u32,
    event_pump: sdl2::EventPump,
    _gl_ctx: sdl2::video::GLContext,
    window: sdl2::video::Window,
    _video_subsystem: sdl2::VideoSubsystem,
    _sdl_context: sdl2::Sdl,
}

impl RenderContext {
    pub fn open(title: &str, w: u32, h: u32) -> Result<RenderContext, HarnessError> {
        let sdl_context = sdl2::init().map_err(HarnessError::WindowCreationFailed)?;
        let video_subsystem = sdl_context
            .video()
            .map_err(HarnessError::WindowCreationFailed)?;

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);

        let window = video_subsystem
            .window(title, w, h)
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| HarnessError::WindowCreationFailed(e.to_string()))?;
        debug!("window '{title}' created ({w}x{h})");

        let gl_ctx = window
            .gl_create_context()
            .map_err(HarnessError::ContextCreationFailed)?;
        gl::load_with(|name| video_subsystem.gl_get_proc_address(name) as *const _);

        let required = [
            ("glCreateShader", gl::CreateShader::is_loaded()),
            ("glCreateProgram", gl::CreateProgram::is_loaded()),
            ("glGenVertexArrays", gl::GenVertexArrays::is_loaded()),
            ("glGenBuffers", gl::GenBuffers::is_loaded()),
            ("glUniformMatrix4fv", gl::UniformMatrix4fv::is_loaded()),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, loaded)| !loaded)
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(HarnessError::ExtensionLoaderFailed(missing.join(", ")));
        }

        debug_assert_eq!(gl_attr.context_profile(), GLProfile::Core);
        debug_assert_eq!(gl_attr.context_version(), (3, 3));

        let event_pump = sdl_context
            .event_pump()
            .map_err(HarnessError::ContextCreationFailed)?;

        log_opengl_info();

        Ok(RenderContext {
            w,
            h,
            event_pump,
            _gl_ctx: gl_ctx,
            window,
            _video_subsystem: video_subsystem,
            _sdl_context: sdl_context,
        })
    }

    /// Releases the context and the window, then shuts SDL down.
    pub fn close(self) {
        info!("closing window '{}'", self.window.title());
        drop(self);
    }

    /// Drains every pending event without waiting for new ones.
    pub fn poll_events(&mut self) -> Vec<IoEvents> {
        self.event_pump.poll_iter().map(map_event).collect()
    }

    pub fn present(&mut self) {
        self.window.gl_swap_window();
    }

    pub fn clear_screen(&mut self, r: f32, g: f32, b: f32) {
        unsafe {
            gl::ClearColor(r, g, b, 0.0);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }
}
