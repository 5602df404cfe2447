//! Subprocess execution with live output forwarding.
//!
//! The child's stdout and stderr are piped rather than inherited. Two copy
//! futures drain the pipes into the caller's sinks while a third waits on the
//! child; all three are joined before the exit status is looked at, so every
//! byte the child wrote has been forwarded by the time a [`PhaseOutcome`] is
//! returned.

use std::ffi::{OsStr, OsString};
use std::process::Stdio;

use tokio::io::{self, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;

use crate::error::ProcessError;

/// Result of one subprocess call.
#[derive(Debug)]
pub struct PhaseOutcome {
    success: bool,
    error: Option<ProcessError>,
}

impl PhaseOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: ProcessError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// The cause of a failed call.
    pub fn error(&self) -> Option<&ProcessError> {
        self.error.as_ref()
    }

    pub fn into_result(self) -> Result<(), ProcessError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Something that can launch external commands.
///
/// The pipeline only talks to processes through this trait.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `program` to completion, forwarding its output as it is produced.
    async fn run(&self, program: &OsStr, args: &[OsString]) -> PhaseOutcome;

    /// Run `program` to completion and return its stdout followed by its
    /// stderr. A non-zero exit is an error.
    async fn capture(&self, program: &OsStr, args: &[OsString]) -> Result<Vec<u8>, ProcessError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    async fn run(&self, program: &OsStr, args: &[OsString]) -> PhaseOutcome {
        (**self).run(program, args).await
    }

    async fn capture(&self, program: &OsStr, args: &[OsString]) -> Result<Vec<u8>, ProcessError> {
        (**self).capture(program, args).await
    }
}

/// Runs commands for real, forwarding to this process's stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &OsStr, args: &[OsString]) -> PhaseOutcome {
        let mut stdout = io::stdout();
        let mut stderr = io::stderr();
        run_with(program, args, &mut stdout, &mut stderr).await
    }

    async fn capture(&self, program: &OsStr, args: &[OsString]) -> Result<Vec<u8>, ProcessError> {
        let name = program.to_string_lossy().into_owned();
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ProcessError::Spawn {
                program: name.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProcessError::Exit {
                program: name,
                status: output.status,
            });
        }

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        Ok(combined)
    }
}

/// Run `program`, copying its stdout into `out` and its stderr into `err`.
pub async fn run_with<O, E>(
    program: &OsStr,
    args: &[OsString],
    out: &mut O,
    err: &mut E,
) -> PhaseOutcome
where
    O: AsyncWrite + Unpin + ?Sized,
    E: AsyncWrite + Unpin + ?Sized,
{
    let name = program.to_string_lossy().into_owned();
    tracing::debug!(program = %name, args = ?args, "spawning");

    let spawned = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(source) => {
            return PhaseOutcome::failed(ProcessError::Spawn {
                program: name,
                source,
            });
        }
    };

    let (Some(mut child_out), Some(mut child_err)) = (child.stdout.take(), child.stderr.take())
    else {
        // Both handles were requested as pipes above.
        let _ = child.kill().await;
        return PhaseOutcome::failed(ProcessError::Stream {
            program: name,
            source: io::Error::other("child output pipes were not captured"),
        });
    };

    let copy_out = async {
        io::copy(&mut child_out, &mut *out).await?;
        out.flush().await
    };
    let copy_err = async {
        io::copy(&mut child_err, &mut *err).await?;
        err.flush().await
    };

    let (out_copied, err_copied, status) = tokio::join!(copy_out, copy_err, child.wait());

    let status = match status {
        Ok(status) => status,
        Err(source) => {
            return PhaseOutcome::failed(ProcessError::Wait {
                program: name,
                source,
            });
        }
    };

    tracing::debug!(program = %name, %status, "exited");

    if !status.success() {
        return PhaseOutcome::failed(ProcessError::Exit {
            program: name,
            status,
        });
    }

    match out_copied.and(err_copied) {
        Ok(()) => PhaseOutcome::succeeded(),
        Err(source) => PhaseOutcome::failed(ProcessError::Stream {
            program: name,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_accessors() {
        let ok = PhaseOutcome::succeeded();
        assert!(ok.success());
        assert!(ok.error().is_none());
        assert!(ok.into_result().is_ok());

        let failed = PhaseOutcome::failed(ProcessError::Spawn {
            program: "nope".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert!(!failed.success());
        assert!(matches!(failed.error(), Some(ProcessError::Spawn { .. })));
        assert!(failed.into_result().is_err());
    }
}
