//! Command-line surface.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

use crate::config::{Config, Standard};
use crate::error::EXIT_FAILURE;

#[derive(Parser, Debug)]
#[command(name = "cpprun")]
#[command(about = "Compile a C++ source file, run it, and clean up the binary")]
#[command(version)]
pub struct Cli {
    /// C++ source file to build and run
    #[arg(value_name = "FILE")]
    pub source: PathBuf,

    /// C++ language standard
    #[arg(short = 's', long = "std", value_enum, default_value_t = Standard::Cxx20)]
    pub standard: Standard,

    /// Compile with debug symbols
    #[arg(short, long)]
    pub debug: bool,

    /// Echo the compile command and report cleanup problems
    #[arg(short, long)]
    pub verbose: bool,

    /// Keep the compiled binary after running it
    #[arg(short = 'n', long)]
    pub no_clean: bool,
}

impl Cli {
    /// Parse `args` (including the program name), mapping clap failures to
    /// the exit status the binary should use.
    pub fn parse_args<I, T>(args: I) -> Result<Self, (clap::Error, u8)>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|err| {
            let code = exit_code_for(&err);
            (err, code)
        })
    }

    pub fn into_config(self) -> Config {
        Config::new(self.source)
            .standard(self.standard)
            .debug(self.debug)
            .verbose(self.verbose)
            .keep_artifact(self.no_clean)
    }
}

/// `--help` and `--version` are not failures; everything else clap rejects
/// is a usage error.
pub fn exit_code_for(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::parse_args(["cpprun", "main.cpp", "-s", "c++17", "-d", "-v", "-n"]).unwrap();
        let config = cli.into_config();
        assert_eq!(config.source, PathBuf::from("main.cpp"));
        assert_eq!(config.standard, Standard::Cxx17);
        assert!(config.debug);
        assert!(config.verbose);
        assert!(config.keep_artifact);
    }

    #[test]
    fn long_flags() {
        let cli = Cli::parse_args(["cpprun", "--std", "c++20", "--no-clean", "x.cpp"]).unwrap();
        assert_eq!(cli.standard, Standard::Cxx20);
        assert!(cli.no_clean);
        assert!(!cli.debug);
    }

    #[test]
    fn help_exits_cleanly() {
        let (err, code) = Cli::parse_args(["cpprun", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(code, 0);
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
