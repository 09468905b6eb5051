use super::error::HarnessError;
use super::glutils::*;
use super::math::*;
use super::system::RenderContext;
use gl::{types::*, *};
use log::{debug, info};
use std::ffi::CString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => VERTEX_SHADER,
            ShaderStage::Fragment => FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Outcome of a compile, link or validate call together with the info log
/// the driver produced for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub success: bool,
    pub log: String,
}

/// The subset of GL the program builder talks to.
///
/// Ids of zero mean creation failed, as in GL.
pub trait ShaderDriver {
    fn create_shader(&mut self, stage: ShaderStage) -> u32;
    fn compile_shader(&mut self, shader: u32, source: &str) -> Diagnostics;
    fn create_program(&mut self) -> u32;
    fn attach_shader(&mut self, program: u32, shader: u32);
    fn link_program(&mut self, program: u32) -> Diagnostics;
    fn validate_program(&mut self, program: u32) -> Diagnostics;
    fn delete_shader(&mut self, shader: u32);
    fn delete_program(&mut self, program: u32);
}

/// [`ShaderDriver`] backed by the current GL context.
pub struct GlDriver;

fn read_info_log(len: GLint, fetch: impl FnOnce(GLsizei, &mut GLsizei, *mut GLchar)) -> String {
    if len <= 0 {
        return String::new();
    }
    let mut v: Vec<u8> = vec![0; len as usize];
    let mut written: GLsizei = 0;
    fetch(len, &mut written, v.as_mut_ptr().cast());
    v.truncate(written.clamp(0, len) as usize);
    String::from_utf8_lossy(&v).trim_end().to_string()
}

fn shader_info_log(shader: u32) -> String {
    let mut len = 0;
    unsafe { gl::GetShaderiv(shader, INFO_LOG_LENGTH, &mut len) };
    read_info_log(len, |cap, written, buf| unsafe {
        gl::GetShaderInfoLog(shader, cap, written, buf)
    })
}

fn program_info_log(program: u32) -> String {
    let mut len = 0;
    unsafe { gl::GetProgramiv(program, INFO_LOG_LENGTH, &mut len) };
    read_info_log(len, |cap, written, buf| unsafe {
        gl::GetProgramInfoLog(program, cap, written, buf)
    })
}

fn program_status(program: u32, status: GLenum) -> Diagnostics {
    let mut success = 0;
    unsafe { gl::GetProgramiv(program, status, &mut success) };
    Diagnostics {
        success: success != 0,
        log: program_info_log(program),
    }
}

impl ShaderDriver for GlDriver {
    fn create_shader(&mut self, stage: ShaderStage) -> u32 {
        unsafe { gl::CreateShader(stage.gl_enum()) }
    }

    fn compile_shader(&mut self, shader: u32, source: &str) -> Diagnostics {
        unsafe {
            gl::ShaderSource(
                shader,
                1,
                &(source.as_bytes().as_ptr().cast()),
                &(source.len() as GLint),
            );
        }

        unsafe { gl::CompileShader(shader) };

        let mut success = 0;
        unsafe {
            gl::GetShaderiv(shader, COMPILE_STATUS, &mut success);
        }
        Diagnostics {
            success: success != 0,
            log: shader_info_log(shader),
        }
    }

    fn create_program(&mut self) -> u32 {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn link_program(&mut self, program: u32) -> Diagnostics {
        unsafe { gl::LinkProgram(program) };
        program_status(program, LINK_STATUS)
    }

    fn validate_program(&mut self, program: u32) -> Diagnostics {
        unsafe { gl::ValidateProgram(program) };
        program_status(program, VALIDATE_STATUS)
    }

    fn delete_shader(&mut self, shader: u32) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn delete_program(&mut self, program: u32) {
        unsafe { gl::DeleteProgram(program) };
    }
}

fn report(what: fmt::Arguments<'_>, diagnostics: &Diagnostics) {
    if diagnostics.log.is_empty() {
        debug!("{what}: no diagnostics");
    } else {
        info!("{what}: {}", diagnostics.log);
    }
}

fn compile_stage<D: ShaderDriver>(
    driver: &mut D,
    stage: ShaderStage,
    source: &str,
) -> Result<u32, HarnessError> {
    let shader = driver.create_shader(stage);
    if shader == 0 {
        return Err(HarnessError::ShaderCreationFailed { stage });
    }

    debug!("compiling {stage} shader");
    let diagnostics = driver.compile_shader(shader, source);
    if !diagnostics.success {
        driver.delete_shader(shader);
        return Err(HarnessError::CompileFailed {
            stage,
            log: diagnostics.log,
        });
    }
    report(format_args!("{stage} shader compile log"), &diagnostics);
    Ok(shader)
}

/// Compiles both stages, links and validates them into a program.
///
/// Returns the program id. Every object created along the way is deleted
/// when a step fails, and the stage objects are deleted once linking has
/// been attempted.
pub fn build_program<D: ShaderDriver>(
    driver: &mut D,
    vertex_code: &str,
    fragment_code: &str,
) -> Result<u32, HarnessError> {
    let vertex_shader = compile_stage(driver, ShaderStage::Vertex, vertex_code)?;

    let fragment_shader = match compile_stage(driver, ShaderStage::Fragment, fragment_code) {
        Ok(id) => id,
        Err(e) => {
            driver.delete_shader(vertex_shader);
            return Err(e);
        }
    };

    let shader_program = driver.create_program();
    if shader_program == 0 {
        driver.delete_shader(vertex_shader);
        driver.delete_shader(fragment_shader);
        return Err(HarnessError::ProgramCreationFailed);
    }
    driver.attach_shader(shader_program, vertex_shader);
    driver.attach_shader(shader_program, fragment_shader);

    debug!("linking program {shader_program}");
    let link = driver.link_program(shader_program);

    // not needed anymore
    driver.delete_shader(vertex_shader);
    driver.delete_shader(fragment_shader);

    if !link.success {
        driver.delete_program(shader_program);
        return Err(HarnessError::LinkFailed { log: link.log });
    }
    report(format_args!("program {shader_program} link log"), &link);

    let validation = driver.validate_program(shader_program);
    if !validation.success {
        driver.delete_program(shader_program);
        return Err(HarnessError::ValidateFailed {
            log: validation.log,
        });
    }
    report(
        format_args!("program {shader_program} validation log"),
        &validation,
    );

    Ok(shader_program)
}

fn read_source(path: &Path) -> Result<String, HarnessError> {
    match fs::read_to_string(path) {
        Ok(code) if code.trim().is_empty() => Err(HarnessError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Ok(code) => {
            debug!("{} read", path.display());
            Ok(code)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(HarnessError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(HarnessError::SourceUnreadable {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Vertex and fragment source text, read wholesale from disk.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex_path: PathBuf,
    pub fragment_path: PathBuf,
    pub vertex_code: String,
    pub fragment_code: String,
}

impl ShaderSources {
    pub fn load(
        vertex_file: impl AsRef<Path>,
        fragment_file: impl AsRef<Path>,
    ) -> Result<ShaderSources, HarnessError> {
        let vertex_path = vertex_file.as_ref().to_path_buf();
        let fragment_path = fragment_file.as_ref().to_path_buf();
        let vertex_code = read_source(&vertex_path)?;
        let fragment_code = read_source(&fragment_path)?;
        Ok(ShaderSources {
            vertex_path,
            fragment_path,
            vertex_code,
            fragment_code,
        })
    }
}

/// A linked and validated GL program. Deleted on drop.
#[derive(Debug)]
pub struct ShaderProgram {
    program_id: u32,
}

impl ShaderProgram {
    pub fn build(
        _ctx: &RenderContext,
        vertex_code: &str,
        fragment_code: &str,
    ) -> Result<ShaderProgram, HarnessError> {
        let program_id = build_program(&mut GlDriver, vertex_code, fragment_code)?;
        Ok(ShaderProgram { program_id })
    }

    pub fn from_sources(
        ctx: &RenderContext,
        sources: &ShaderSources,
    ) -> Result<ShaderProgram, HarnessError> {
        info!(
            "building program from {} and {}",
            sources.vertex_path.display(),
            sources.fragment_path.display()
        );
        Self::build(ctx, &sources.vertex_code, &sources.fragment_code)
    }

    pub fn id(&self) -> u32 {
        self.program_id
    }

    pub fn uniform_location(&self, name: &str) -> Result<i32, HarnessError> {
        let not_found = || HarnessError::UniformNotFound {
            name: name.to_string(),
        };
        let c_name = CString::new(name).map_err(|_| not_found())?;
        let location = unsafe { gl::GetUniformLocation(self.program_id, c_name.as_ptr().cast()) };
        check_gl_err("glGetUniformLocation")?;
        if location == -1 {
            return Err(not_found());
        }
        Ok(location)
    }

    pub fn use_program(&self) -> Result<(), HarnessError> {
        unsafe { gl::UseProgram(self.program_id) };
        check_gl_err("glUseProgram")
    }

    pub fn set_mat4fv(&self, location: i32, mat: &Mat4x4) {
        let arr = mat.to_cols_array();
        unsafe { gl::UniformMatrix4fv(location, 1, FALSE, arr.as_ptr()) };
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.program_id) };
    }
}
