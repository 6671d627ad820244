// src/errors.rs

//! Crate-wide error type and result alias.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    /// Invalid command or watch target. Raised before any watching begins.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The child process could not be launched.
    #[error("failed to spawn `{command}`: {source}")]
    SpawnError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The child survived both the graceful stop and the forced kill.
    #[error("child process{} did not exit within {waited:?}", pid_label(.pid))]
    TerminationTimeout { pid: Option<u32>, waited: Duration },

    #[error("Invalid supervisor state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    NotifyError(#[from] notify::Error),
}

impl SupervisorError {
    /// Errors the supervision loop logs and survives.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SupervisorError::SpawnError { .. })
    }
}

fn pid_label(pid: &Option<u32>) -> String {
    pid.map(|p| format!(" {p}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
