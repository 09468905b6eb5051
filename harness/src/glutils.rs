use gl::{types::*, *};
use log::info;
use std::ffi::CStr;

use crate::error::HarnessError;
use crate::math::Vec3;
use crate::system::RenderContext;

pub fn check_gl_err(context: &'static str) -> Result<(), HarnessError> {
    let err = unsafe { gl::GetError() };
    if err == gl::NO_ERROR {
        return Ok(());
    }
    Err(HarnessError::Gl { code: err, context })
}

fn gl_string(name: GLenum) -> String {
    let ptr = unsafe { gl::GetString(name) };
    if ptr.is_null() {
        return "<unknown>".to_string();
    }
    unsafe { CStr::from_ptr(ptr.cast()) }
        .to_string_lossy()
        .into_owned()
}

pub fn log_opengl_info() {
    info!("GL_VENDOR = {}", gl_string(VENDOR));
    info!("GL_RENDERER = {}", gl_string(RENDERER));
    info!("GL_VERSION = {}", gl_string(VERSION));
    info!(
        "GL_SHADING_LANGUAGE_VERSION = {}",
        gl_string(SHADING_LANGUAGE_VERSION)
    );
}

pub fn gl_buffer_data_arr_stat<T: Sized>(buffer: &[T]) {
    unsafe {
        gl::BufferData(
            ARRAY_BUFFER,
            std::mem::size_of_val(buffer) as isize,
            buffer.as_ptr().cast(),
            STATIC_DRAW,
        )
    };
}

pub fn gl_vertex_attrib_ptr_enab(index: u32, size: u32, stride: u32, pointer: usize) {
    unsafe {
        gl::VertexAttribPointer(
            index,
            size as i32,
            FLOAT,
            FALSE,
            (stride as usize * std::mem::size_of::<f32>()) as i32,
            (pointer * std::mem::size_of::<f32>()) as *const _,
        )
    };
    unsafe { gl::EnableVertexAttribArray(index) };
}

/// Positions uploaded once to GPU memory, with the vertex array describing
/// them as attribute 0.
pub struct VertexBuffer {
    vao: u32,
    vbo: u32,
    vertex_count: i32,
}

impl VertexBuffer {
    pub fn upload(_ctx: &RenderContext, vertices: &[Vec3]) -> Result<VertexBuffer, HarnessError> {
        let mut vao = 0;
        let mut vbo = 0;
        unsafe { gl::GenVertexArrays(1, &mut vao) };
        unsafe { gl::BindVertexArray(vao) };
        unsafe { gl::GenBuffers(1, &mut vbo) };
        unsafe { gl::BindBuffer(ARRAY_BUFFER, vbo) };

        // constructed before the checks so a failure below still frees both names
        let buffer = VertexBuffer {
            vao,
            vbo,
            vertex_count: vertices.len() as i32,
        };

        gl_buffer_data_arr_stat(vertices);
        check_gl_err("uploading vertex data")?;

        gl_vertex_attrib_ptr_enab(0, 3, 3, 0);
        check_gl_err("describing vertex attributes")?;

        Ok(buffer)
    }

    pub fn bind(&self) {
        unsafe { gl::BindVertexArray(self.vao) };
        unsafe { gl::BindBuffer(ARRAY_BUFFER, self.vbo) };
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}
