/// Build-run-cleanup pipeline
///
/// Drives one source file through compile, run and cleanup:
///
/// ```text
/// Init -> Compiling -> CompileFailed
///                   -> Running -> RunFailed | RunSucceeded -> Cleanup -> Done
/// ```
///
/// A failed compile stops immediately, since there is nothing to run or
/// remove. A failed run still goes through cleanup.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::runner::CommandRunner;
use crate::style::{self, Style};
use crate::toolchain::{self, Toolchain};

/// Warning flags always passed to the compiler
pub const WARNING_FLAGS: [&str; 2] = ["-Wall", "-Wextra"];

/// Pipeline states, in the order they can be entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Init,
    Compiling,
    CompileFailed,
    Running,
    RunFailed,
    RunSucceeded,
    Cleanup,
    Done,
}

/// The executable produced from a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
}

impl Artifact {
    /// Base name of `source` without its extension, plus the platform
    /// executable suffix, placed in `work_dir`.
    pub fn derive(source: &Path, work_dir: &Path) -> Self {
        let mut name = source
            .file_stem()
            .map(|stem| stem.to_os_string())
            .unwrap_or_else(|| OsString::from("a.out"));
        name.push(std::env::consts::EXE_SUFFIX);

        let path = if work_dir == Path::new(".") || work_dir.as_os_str().is_empty() {
            PathBuf::from(name)
        } else {
            work_dir.join(name)
        };
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// How the artifact is launched. A bare name gets a `./` prefix, since
    /// the current directory is not searched when spawning.
    pub fn invocation(&self) -> PathBuf {
        if self.path.components().count() > 1 {
            self.path.clone()
        } else {
            Path::new(".").join(&self.path)
        }
    }
}

/// What a successful pipeline left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub artifact: PathBuf,
    /// Set when the binary was kept on disk
    pub kept: Option<PathBuf>,
}

pub struct Pipeline<R> {
    config: Config,
    toolchain: Toolchain,
    runner: R,
    history: Vec<State>,
}

impl<R: CommandRunner> Pipeline<R> {
    pub fn new(config: Config, toolchain: Toolchain, runner: R) -> Self {
        Self {
            config,
            toolchain,
            runner,
            history: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Every state entered so far, oldest first.
    pub fn history(&self) -> &[State] {
        &self.history
    }

    pub fn state(&self) -> Option<State> {
        self.history.last().copied()
    }

    /// Flags placed before the output and source arguments.
    pub fn compile_flags(&self) -> Vec<String> {
        let mut flags = vec![self.config.standard.flag()];
        flags.extend(WARNING_FLAGS.iter().map(|flag| flag.to_string()));
        if self.config.debug {
            flags.push("-g".to_string());
        }
        flags
    }

    pub fn compile_args(&self, artifact: &Artifact) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.compile_flags().into_iter().map(OsString::from).collect();
        args.push("-o".into());
        args.push(artifact.path().into());
        args.push(self.config.source.clone().into());
        args
    }

    pub async fn run(&mut self) -> Result<Summary> {
        self.enter(State::Init);
        if !self.config.source.exists() {
            let path = self.config.source.clone();
            return Err(self.fail(PipelineError::SourceNotFound { path }));
        }
        let artifact = Artifact::derive(&self.config.source, &self.config.work_dir);

        if self.config.verbose {
            println!(
                "{}",
                style::banner(Style::Orange, "🔍 Verbose mode enabled - tracing commands...")
            );
        }
        self.show_compiler_info().await;

        self.enter(State::Compiling);
        self.compile(&artifact).await?;

        self.enter(State::Running);
        let ran = self.execute(&artifact).await;

        self.enter(State::Cleanup);
        let kept = self.cleanup(&artifact);
        println!("{}", style::banner(Style::Green, "✨ All done!"));
        self.enter(State::Done);

        ran.map(|()| Summary {
            artifact: artifact.path().to_path_buf(),
            kept,
        })
    }

    async fn show_compiler_info(&self) {
        let version = toolchain::inspect_version(&self.runner, self.toolchain.path.as_os_str()).await;
        let name = &self.toolchain.name;
        println!("{}", style::rule(Style::Cyan));
        println!("{}", style::paint(Style::Blue, &format!("🔧    Compiler {}:", name)));
        println!(
            "{}",
            style::paint(Style::Pink, &format!("🛠️     {} Version: {}", name, version))
        );
        println!(
            "{}",
            style::paint(
                Style::Cyan,
                &format!("📋    C++ Standard Version: {}", self.config.standard)
            )
        );
        println!(
            "{}",
            style::paint(
                Style::Teal,
                &format!("🚩    Compiler Flags: {}", self.compile_flags().join(" "))
            )
        );
        println!("{}", style::rule(Style::Cyan));
    }

    async fn compile(&mut self, artifact: &Artifact) -> Result<()> {
        if self.config.debug {
            println!("{}", style::banner(Style::Orange, "🐞 Debug mode enabled!"));
        } else {
            println!(
                "{}",
                style::banner(Style::Cyan, "🔨 Compiling with standard optimizations...")
            );
        }

        let args = self.compile_args(artifact);
        if self.config.verbose {
            let line: Vec<_> = args.iter().map(|arg| arg.to_string_lossy()).collect();
            println!("Executing: {} {}", self.toolchain.name, line.join(" "));
        }

        let outcome = self.runner.run(self.toolchain.path.as_os_str(), &args).await;
        if let Err(source) = outcome.into_result() {
            self.enter(State::CompileFailed);
            tracing::debug!(%source, "compile phase failed");
            return Err(self.fail(PipelineError::CompileFailed { source }));
        }

        println!("{}", style::banner(Style::Green, "✅ Compilation successful!"));
        Ok(())
    }

    async fn execute(&mut self, artifact: &Artifact) -> Result<()> {
        println!(
            "{}",
            style::paint(Style::Blue, &format!("🚀 Running {}...", artifact.display_name()))
        );
        println!("{}", style::rule(Style::Cyan));
        println!("{}", style::rule(Style::Cyan));
        println!("{}", style::paint(Style::Blue, "📤 Program Output:"));
        println!("{}", style::rule(Style::Cyan));

        let program = artifact.invocation();
        let outcome = self.runner.run(program.as_os_str(), &[]).await;
        println!("{}", style::rule(Style::Cyan));

        match outcome.into_result() {
            Ok(()) => {
                self.enter(State::RunSucceeded);
                Ok(())
            }
            Err(source) => {
                self.enter(State::RunFailed);
                tracing::debug!(%source, "run phase failed");
                println!("{}", style::banner(Style::Red, "❌ Program execution failed!"));
                Err(PipelineError::RunFailed {
                    artifact: artifact.path().to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Remove the artifact unless configured to keep it. Returns the kept
    /// path, if any.
    fn cleanup(&self, artifact: &Artifact) -> Option<PathBuf> {
        if self.config.keep_artifact {
            let message = format!("📝 Keeping binary file: {}", artifact.path().display());
            println!("{}", style::banner(Style::Yellow, &message));
            return Some(artifact.path().to_path_buf());
        }

        println!("{}", style::banner(Style::Purple, "🧹 Cleaning up..."));
        if let Err(err) = fs::remove_file(artifact.path()) {
            // non-fatal; silent unless verbose
            tracing::debug!(%err, path = %artifact.path().display(), "artifact removal failed");
            if self.config.verbose {
                let warning = format!("Warning: Could not remove file: {}", err);
                println!("{}", style::paint(Style::Yellow, &warning));
            }
        }
        None
    }

    fn enter(&mut self, state: State) {
        tracing::debug!(?state, "pipeline state");
        self.history.push(state);
    }

    fn fail(&self, err: PipelineError) -> PipelineError {
        println!("{}", style::error_banner(&err.to_string()));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::PhaseOutcome;
    use crate::error::ProcessError;
    use std::ffi::OsStr;

    struct NeverRuns;

    impl CommandRunner for NeverRuns {
        async fn run(&self, _: &OsStr, _: &[OsString]) -> PhaseOutcome {
            unreachable!("no process expected")
        }

        async fn capture(&self, _: &OsStr, _: &[OsString]) -> std::result::Result<Vec<u8>, ProcessError> {
            unreachable!("no process expected")
        }
    }

    fn pipeline(config: Config) -> Pipeline<NeverRuns> {
        let toolchain = Toolchain {
            name: "g++".into(),
            path: PathBuf::from("/usr/bin/g++"),
        };
        Pipeline::new(config, toolchain, NeverRuns)
    }

    #[test]
    fn artifact_strips_extension_and_directories() {
        let artifact = Artifact::derive(Path::new("src/demo/hello.cpp"), Path::new("."));
        let expected = format!("hello{}", std::env::consts::EXE_SUFFIX);
        assert_eq!(artifact.path(), Path::new(&expected));
        assert_eq!(artifact.display_name(), expected);
    }

    #[test]
    fn artifact_keeps_inner_dots() {
        let artifact = Artifact::derive(Path::new("v1.2.cpp"), Path::new("."));
        assert_eq!(
            artifact.path(),
            Path::new(&format!("v1.2{}", std::env::consts::EXE_SUFFIX))
        );
    }

    #[test]
    fn artifact_lands_in_work_dir() {
        let artifact = Artifact::derive(Path::new("hello.cpp"), Path::new("/tmp/build"));
        let expected = Path::new("/tmp/build").join(format!("hello{}", std::env::consts::EXE_SUFFIX));
        assert_eq!(artifact.path(), expected);
        assert_eq!(artifact.invocation(), expected);
    }

    #[test]
    fn bare_artifact_runs_relative_to_cwd() {
        let artifact = Artifact::derive(Path::new("hello.cpp"), Path::new("."));
        let invocation = artifact.invocation();
        assert_eq!(invocation.parent(), Some(Path::new(".")));
        assert_eq!(invocation.file_name(), artifact.path().file_name());
    }

    #[cfg(unix)]
    #[test]
    fn bare_artifact_unix_form() {
        let artifact = Artifact::derive(Path::new("hello.cpp"), Path::new("."));
        assert_eq!(artifact.invocation(), PathBuf::from("./hello"));
    }

    #[test]
    fn compile_args_in_order() {
        let p = pipeline(Config::new("hello.cpp"));
        let artifact = Artifact::derive(Path::new("hello.cpp"), Path::new("."));
        let args = p.compile_args(&artifact);
        let expected: Vec<OsString> = vec![
            "-std=c++20".into(),
            "-Wall".into(),
            "-Wextra".into(),
            "-o".into(),
            artifact.path().into(),
            "hello.cpp".into(),
        ];
        assert_eq!(args, expected);
    }

    #[test]
    fn debug_adds_symbols_before_output() {
        let p = pipeline(
            Config::new("hello.cpp")
                .standard(crate::config::Standard::Cxx17)
                .debug(true),
        );
        assert_eq!(p.compile_flags(), vec!["-std=c++17", "-Wall", "-Wextra", "-g"]);
    }

    #[tokio::test]
    async fn missing_source_stops_in_init() {
        let mut p = pipeline(Config::new("/definitely/not/here.cpp"));
        let err = p.run().await.unwrap_err();
        assert!(matches!(err, PipelineError::SourceNotFound { .. }));
        assert_eq!(p.history(), &[State::Init]);
    }
}
