/// cpprun CLI

use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cpprun::toolchain::DEFAULT_TOOLCHAIN;
use cpprun::style;
use cpprun::{Cli, Pipeline, ProcessRunner, toolchain};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            println!("{}", style::error_banner(&format!("{:#}", err)));
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    // Nothing else is attempted without a compiler.
    let toolchain = match toolchain::locate(DEFAULT_TOOLCHAIN) {
        Ok(toolchain) => toolchain,
        Err(err) => {
            println!("Error: {}", err);
            return Ok(ExitCode::from(err.exit_code()));
        }
    };

    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err((err, code)) => {
            let _ = err.print();
            return Ok(ExitCode::from(code));
        }
    };

    init_tracing(cli.verbose).context("failed to initialise logging")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let mut pipeline = Pipeline::new(cli.into_config(), toolchain, ProcessRunner);
    let code = match runtime.block_on(pipeline.run()) {
        Ok(summary) => {
            tracing::debug!(artifact = %summary.artifact.display(), kept = summary.kept.is_some(), "finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(error = %err, "pipeline failed");
            ExitCode::from(err.exit_code())
        }
    };
    Ok(code)
}

/// Verbose runs log debug detail to stderr; otherwise only errors.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let directive = if verbose { "cpprun=debug" } else { "cpprun=error" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("{}", err))
}
