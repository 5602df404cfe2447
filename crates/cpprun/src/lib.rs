/// cpprun
///
/// Builds a single C++ source file with an external toolchain, runs the
/// resulting binary with its output streamed to the console, and removes the
/// binary afterwards unless asked to keep it.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod runner;
pub mod style;
pub mod toolchain;

pub use cli::Cli;
pub use config::{Config, Standard};
pub use error::{PipelineError, ProcessError, Result};
pub use pipeline::{Artifact, Pipeline, State, Summary};
pub use runner::{CommandRunner, PhaseOutcome, ProcessRunner};
pub use toolchain::{Toolchain, UNKNOWN_VERSION};
