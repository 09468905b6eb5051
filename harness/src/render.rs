use gl::*;

use crate::error::HarnessError;
use crate::frame::FrameBackend;
use crate::glutils::{check_gl_err, VertexBuffer};
use crate::math::Mat4x4;
use crate::shaders::ShaderProgram;
use crate::system::{IoEvents, RenderContext};

/// Draws a single triangle from `vertices` with `program` into the context's
/// window.
pub struct TriangleScene<'a> {
    ctx: &'a mut RenderContext,
    program: &'a ShaderProgram,
    vertices: &'a VertexBuffer,
    world_location: Option<i32>,
    clear_color: [f32; 3],
}

impl<'a> TriangleScene<'a> {
    pub fn new(
        ctx: &'a mut RenderContext,
        program: &'a ShaderProgram,
        vertices: &'a VertexBuffer,
        clear_color: [f32; 3],
    ) -> TriangleScene<'a> {
        TriangleScene {
            ctx,
            program,
            vertices,
            world_location: None,
            clear_color,
        }
    }

    /// Looks up the matrix uniform the transform hook feeds.
    pub fn with_world_uniform(mut self, name: &str) -> Result<TriangleScene<'a>, HarnessError> {
        self.world_location = Some(self.program.uniform_location(name)?);
        Ok(self)
    }
}

impl FrameBackend for TriangleScene<'_> {
    fn poll_events(&mut self) -> Vec<IoEvents> {
        self.ctx.poll_events()
    }

    fn clear(&mut self) {
        let [r, g, b] = self.clear_color;
        self.ctx.clear_screen(r, g, b);
    }

    fn upload_transform(&mut self, transform: &Mat4x4) -> Result<(), HarnessError> {
        let location = match self.world_location {
            Some(location) => location,
            None => {
                return Err(HarnessError::UniformNotFound {
                    name: "<world transform>".to_string(),
                })
            }
        };
        self.program.use_program()?;
        self.program.set_mat4fv(location, transform);
        check_gl_err("glUniformMatrix4fv")
    }

    fn draw_triangle(&mut self) -> Result<(), HarnessError> {
        self.program.use_program()?;
        self.vertices.bind();
        unsafe { gl::DrawArrays(TRIANGLES, 0, self.vertices.vertex_count()) };
        check_gl_err("glDrawArrays")
    }

    fn present(&mut self) {
        self.ctx.present();
    }
}
