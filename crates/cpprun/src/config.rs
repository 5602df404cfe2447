//! Run configuration.
//!
//! A [`Config`] is built once, before the pipeline starts, and is only read
//! afterwards.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

/// Supported C++ language standards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Standard {
    #[value(name = "c++17")]
    Cxx17,
    #[default]
    #[value(name = "c++20")]
    Cxx20,
}

impl Standard {
    pub fn as_str(self) -> &'static str {
        match self {
            Standard::Cxx17 => "c++17",
            Standard::Cxx20 => "c++20",
        }
    }

    /// The `-std=` flag passed to the compiler.
    pub fn flag(self) -> String {
        format!("-std={}", self.as_str())
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a single build-run-cleanup invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// Language standard handed to the compiler
    pub standard: Standard,
    /// Compile with debug symbols (`-g`)
    pub debug: bool,
    /// Echo commands and surface cleanup warnings
    pub verbose: bool,
    /// Leave the compiled binary in place after running it
    pub keep_artifact: bool,
    /// The C++ source file to build
    pub source: PathBuf,
    /// Directory the binary is written into
    pub work_dir: PathBuf,
}

impl Config {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            standard: Standard::default(),
            debug: false,
            verbose: false,
            keep_artifact: false,
            source: source.into(),
            work_dir: PathBuf::from("."),
        }
    }

    pub fn standard(mut self, standard: Standard) -> Self {
        self.standard = standard;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn keep_artifact(mut self, keep: bool) -> Self {
        self.keep_artifact = keep;
        self
    }

    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }
}
