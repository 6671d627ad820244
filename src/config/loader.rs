// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, SupervisorConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** check that the
/// command or the watch directory make sense. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SupervisorConfig> {
    let raw_config = load_from_path(&path)?;
    SupervisorConfig::try_from(raw_config)
}

/// Build the effective config for a CLI invocation.
///
/// - An explicit `--config` must exist and parse.
/// - Without one, `Watchrun.toml` in the working directory is used if present.
/// - Otherwise built-in defaults apply.
///
/// CLI flags are layered on top before validation.
pub fn resolve(args: &CliArgs) -> Result<SupervisorConfig> {
    let mut raw = match args.config {
        Some(ref path) => load_from_path(path)?,
        None => {
            let fallback = default_config_path();
            if fallback.is_file() {
                debug!(path = ?fallback, "using config file from working directory");
                load_from_path(&fallback)?
            } else {
                RawConfigFile::default()
            }
        }
    };

    raw.apply_cli_overrides(args);
    SupervisorConfig::try_from(raw)
}

/// Config file picked up from the working directory when `--config` is absent.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Watchrun.toml")
}
