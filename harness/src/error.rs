use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::shaders::ShaderStage;

/// Errors produced while setting up or driving the harness.
///
/// None of them is recoverable: callers report the error and leave with
/// [`HarnessError::exit_code`].
#[derive(Debug, Error)]
pub enum HarnessError {
    /// SDL could not be initialized or the window could not be built.
    #[error("could not create window: {0}")]
    WindowCreationFailed(String),

    /// The GL context (or the event pump bound to it) could not be created.
    #[error("could not create OpenGL context: {0}")]
    ContextCreationFailed(String),

    /// GL entry points were missing after loading them through SDL.
    #[error("failed to load OpenGL functions: {0}")]
    ExtensionLoaderFailed(String),

    /// A shader source file does not exist or holds no source text.
    #[error("could not read file {}: file does not exist or is empty", path.display())]
    FileNotFound { path: PathBuf },

    #[error("error reading {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error creating {stage} shader")]
    ShaderCreationFailed { stage: ShaderStage },

    #[error("error compiling {stage} shader: '{log}'")]
    CompileFailed { stage: ShaderStage, log: String },

    #[error("error creating shader program")]
    ProgramCreationFailed,

    #[error("error linking shader program: '{log}'")]
    LinkFailed { log: String },

    #[error("invalid shader program: '{log}'")]
    ValidateFailed { log: String },

    /// The name does not correspond to an active uniform of the program.
    #[error("'{name}' is not an active uniform variable in program")]
    UniformNotFound { name: String },

    #[error("OpenGL error 0x{code:04x} after {context}")]
    Gl { code: u32, context: &'static str },
}

impl HarnessError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::ExtensionLoaderFailed(_) => -1,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_failure_exits_with_minus_one() {
        let err = HarnessError::ExtensionLoaderFailed("glCreateShader".to_string());
        assert_eq!(err.exit_code(), -1);
    }

    #[test]
    fn other_failures_exit_with_one() {
        let errors = [
            HarnessError::WindowCreationFailed("no display".to_string()),
            HarnessError::FileNotFound {
                path: PathBuf::from("shaders/world.vert"),
            },
            HarnessError::CompileFailed {
                stage: ShaderStage::Fragment,
                log: "0:1(1): error".to_string(),
            },
            HarnessError::ValidateFailed { log: String::new() },
        ];
        for err in &errors {
            assert_eq!(err.exit_code(), 1, "{err}");
        }
    }

    #[test]
    fn compile_error_names_the_stage() {
        let err = HarnessError::CompileFailed {
            stage: ShaderStage::Vertex,
            log: "syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "error compiling vertex shader: 'syntax error'"
        );
    }
}
