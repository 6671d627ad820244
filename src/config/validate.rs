// src/config/validate.rs

use std::path::Path;
use std::time::Duration;

use crate::config::model::{RawConfigFile, SupervisorConfig};
use crate::errors::{Result, SupervisorError};
use crate::types::{CommandLine, WatchTarget};
use crate::watch::EventFilter;

impl TryFrom<RawConfigFile> for SupervisorConfig {
    type Error = SupervisorError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let command = CommandLine::new(raw.supervisor.command);
        check_command(&command)?;

        let target = WatchTarget::new(raw.watch.dir, raw.watch.recursive);
        check_watch_dir(&target.dir)?;

        if raw.supervisor.stop_timeout_ms == 0 {
            return Err(SupervisorError::ConfigError(
                "[supervisor].stop_timeout_ms must be >= 1 (got 0)".to_string(),
            ));
        }

        if raw.watch.extensions.is_empty() {
            return Err(SupervisorError::ConfigError(
                "[watch].extensions must list at least one extension".to_string(),
            ));
        }

        let filter = EventFilter::new(&target.dir, &raw.watch.extensions, &raw.watch.exclude)?;

        Ok(SupervisorConfig::new(command, target)
            .with_filter(filter)
            .with_stop_timeout(Duration::from_millis(raw.supervisor.stop_timeout_ms))
            .with_debounce(Duration::from_millis(raw.supervisor.debounce_ms)))
    }
}

/// The command must name a program.
pub fn check_command(command: &CommandLine) -> Result<()> {
    match command.program() {
        None => Err(SupervisorError::ConfigError(
            "command must not be empty".to_string(),
        )),
        Some(program) if program.trim().is_empty() => Err(SupervisorError::ConfigError(
            "command must start with a program name (got an empty string)".to_string(),
        )),
        Some(_) => Ok(()),
    }
}

/// The watch directory must exist and be a directory.
pub fn check_watch_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(SupervisorError::ConfigError(format!(
            "watch directory {:?} does not exist",
            dir
        )));
    }
    if !dir.is_dir() {
        return Err(SupervisorError::ConfigError(format!(
            "watch path {:?} is not a directory",
            dir
        )));
    }
    Ok(())
}
