// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for the `femexec` harness.
///
/// The harness runs one static-mode solver execution and polls it to
/// completion; it exists to check the executor against a real OS
/// environment.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "femexec",
    version,
    about = "Run an external FEM solver program as a polled static execution.",
    long_about = None
)]
pub struct CliArgs {
    /// Solver executable (or any program to exercise the poll loop).
    #[arg(long, value_name = "PATH", default_value = "ls")]
    pub command: String,

    /// Single filename (or argument) passed to the command.
    #[arg(long, value_name = "FILE", default_value = "-l")]
    pub filename: String,

    /// Working directory for the run.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub work_dir: String,

    /// Parse tmp_disp.out / tmp_forc.out after the process exits.
    #[arg(long)]
    pub process_output_files: bool,

    /// Poll interval in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 500)]
    pub poll_interval_ms: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FEMEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
