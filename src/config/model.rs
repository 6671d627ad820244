// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::cli::CliArgs;
use crate::types::{CommandLine, WatchTarget};
use crate::watch::EventFilter;

pub const DEFAULT_COMMAND: [&str; 2] = ["python3", "main.py"];
pub const DEFAULT_EXTENSIONS: [&str; 1] = ["py"];
pub const DEFAULT_STOP_TIMEOUT_MS: u64 = 5_000;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [supervisor]
/// command = ["python3", "main.py"]
/// stop_timeout_ms = 5000
/// debounce_ms = 0
///
/// [watch]
/// dir = "."
/// recursive = true
/// extensions = ["py"]
/// exclude = ["**/__pycache__/**"]
/// ```
///
/// All sections are optional and have reasonable defaults. This struct is
/// unvalidated; convert it into a [`SupervisorConfig`] with `try_from`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub supervisor: SupervisorSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// `[supervisor]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupervisorSection {
    /// Executable followed by its arguments.
    #[serde(default = "default_command")]
    pub command: Vec<String>,

    /// Grace period between the termination signal and a forced kill.
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,

    /// Window for coalescing bursts of changes. `0` disables debouncing.
    #[serde(default)]
    pub debounce_ms: u64,
}

fn default_command() -> Vec<String> {
    DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect()
}

fn default_stop_timeout_ms() -> u64 {
    DEFAULT_STOP_TIMEOUT_MS
}

impl Default for SupervisorSection {
    fn default() -> Self {
        Self {
            command: default_command(),
            stop_timeout_ms: default_stop_timeout_ms(),
            debounce_ms: 0,
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    #[serde(default = "default_dir")]
    pub dir: String,

    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Extensions (with or without the leading dot) that count as source files.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Globs relative to `dir` that never trigger a restart.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_dir() -> String {
    ".".to_string()
}

fn default_recursive() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            recursive: default_recursive(),
            extensions: default_extensions(),
            exclude: Vec::new(),
        }
    }
}

impl RawConfigFile {
    /// Overlay values given on the command line. Flags win over the file.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if !args.command.is_empty() {
            self.supervisor.command = args.command.clone();
        }
        if let Some(ms) = args.stop_timeout_ms {
            self.supervisor.stop_timeout_ms = ms;
        }
        if let Some(ms) = args.debounce_ms {
            self.supervisor.debounce_ms = ms;
        }
        if let Some(ref dir) = args.watch_dir {
            self.watch.dir = dir.clone();
        }
        if args.no_recursive {
            self.watch.recursive = false;
        }
        if !args.extensions.is_empty() {
            self.watch.extensions = args.extensions.clone();
        }
        if !args.exclude.is_empty() {
            self.watch.exclude = args.exclude.clone();
        }
    }
}

/// Validated settings a [`Supervisor`](crate::engine::Supervisor) runs with.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub command: CommandLine,
    pub target: WatchTarget,
    pub filter: EventFilter,
    pub stop_timeout: Duration,
    pub debounce: Duration,
}

impl SupervisorConfig {
    /// Build a config with default filter and timeouts.
    ///
    /// Nothing is checked here; `Supervisor::start` validates the command and
    /// the watch directory before doing anything.
    pub fn new(command: CommandLine, target: WatchTarget) -> Self {
        let filter = EventFilter::for_extensions(&target.dir, DEFAULT_EXTENSIONS);
        Self {
            command,
            target,
            filter,
            stop_timeout: Duration::from_millis(DEFAULT_STOP_TIMEOUT_MS),
            debounce: Duration::ZERO,
        }
    }

    pub fn with_filter(mut self, filter: EventFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }
}
