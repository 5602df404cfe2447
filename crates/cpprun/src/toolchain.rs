//! Locating the compiler and asking it for its version.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::error::{PipelineError, Result};
use crate::runner::CommandRunner;

/// The compiler the binary gates on.
pub const DEFAULT_TOOLCHAIN: &str = "g++";

/// Placeholder shown when the compiler version cannot be determined.
pub const UNKNOWN_VERSION: &str = "Unknown";

/// A compiler found on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Name it was looked up by, e.g. `g++`
    pub name: String,
    /// Resolved executable
    pub path: PathBuf,
}

/// Resolve `tool` against `PATH`.
pub fn locate(tool: &str) -> Result<Toolchain> {
    let path = which::which(tool).map_err(|_| PipelineError::ToolchainNotFound {
        tool: tool.to_string(),
    })?;
    tracing::debug!(tool, path = %path.display(), "toolchain located");
    Ok(Toolchain {
        name: tool.to_string(),
        path,
    })
}

/// Resolve `tool` against an explicit search path instead of `PATH`.
pub fn locate_in(tool: &str, search_path: impl AsRef<OsStr>) -> Result<Toolchain> {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let path = which::which_in(tool, Some(search_path), cwd).map_err(|_| {
        PipelineError::ToolchainNotFound {
            tool: tool.to_string(),
        }
    })?;
    Ok(Toolchain {
        name: tool.to_string(),
        path,
    })
}

/// Ask the compiler for its version, falling back to [`UNKNOWN_VERSION`].
pub async fn inspect_version<R: CommandRunner>(runner: &R, program: &OsStr) -> String {
    match runner.capture(program, &[OsString::from("--version")]).await {
        Ok(output) => parse_version(&String::from_utf8_lossy(&output)),
        Err(err) => {
            tracing::debug!(%err, "version inspection failed");
            UNKNOWN_VERSION.to_string()
        }
    }
}

/// The fourth whitespace-separated field of the first line.
///
/// `g++ (Ubuntu 11.4.0-1ubuntu1~22.04) 11.4.0` yields `11.4.0`.
pub fn parse_version(output: &str) -> String {
    output
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(3))
        .unwrap_or(UNKNOWN_VERSION)
        .to_string()
}
