// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchrun`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "watchrun",
    version,
    about = "Restart a command whenever a watched source file changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a config file (TOML).
    ///
    /// If omitted, `Watchrun.toml` in the current directory is used when it
    /// exists; otherwise built-in defaults apply.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Directory to watch (default: current directory).
    #[arg(long, value_name = "DIR")]
    pub watch_dir: Option<String>,

    /// Only watch the top-level directory, not its subdirectories.
    #[arg(long)]
    pub no_recursive: bool,

    /// File extension that triggers a restart. Repeatable.
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Glob (relative to the watch dir) whose matches never trigger a restart.
    /// Repeatable.
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// How long to wait for a graceful exit before killing the child.
    #[arg(long, value_name = "MS")]
    pub stop_timeout_ms: Option<u64>,

    /// Coalesce change bursts within this window into one restart (0 = off).
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate and print the resolved configuration without running anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Command to supervise (default: `python3 main.py`).
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
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
