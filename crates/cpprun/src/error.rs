/// Error types for the build-run-cleanup pipeline

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Exit status reported for every fatal condition.
pub const EXIT_FAILURE: u8 = 1;

/// Why a single subprocess call did not succeed.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to forward output of `{program}`: {source}")]
    Stream {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with {status}")]
    Exit { program: String, status: ExitStatus },
}

/// Fatal pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The compiler could not be found on the search path
    #[error("{tool} compiler is not installed. Please install it first.")]
    ToolchainNotFound { tool: String },

    #[error("File '{}' not found!", .path.display())]
    SourceNotFound { path: PathBuf },

    /// The compiler ran and failed, or could not be launched
    #[error("Compilation failed!")]
    CompileFailed {
        #[source]
        source: ProcessError,
    },

    /// The compiled program exited non-zero. Cleanup has already run.
    #[error("Program execution failed!")]
    RunFailed {
        artifact: PathBuf,
        #[source]
        source: ProcessError,
    },
}

impl PipelineError {
    pub fn exit_code(&self) -> u8 {
        EXIT_FAILURE
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_not_found_names_the_path() {
        let err = PipelineError::SourceNotFound {
            path: PathBuf::from("missing.cpp"),
        };
        assert_eq!(err.to_string(), "File 'missing.cpp' not found!");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn compile_failure_keeps_process_cause() {
        let err = PipelineError::CompileFailed {
            source: ProcessError::Spawn {
                program: "g++".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            },
        };
        let cause = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(cause.as_deref(), Some("failed to launch `g++`: no such file"));
    }
}
