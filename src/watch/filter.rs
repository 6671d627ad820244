// src/watch/filter.rs

//! Decides whether a filesystem event should restart the child.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::{Result, SupervisorError};
use crate::types::{FileEvent, FileEventKind};
use crate::watch::path_utils::relative_str;

/// Extension + exclude-glob filter for change events.
///
/// An event qualifies when it is a modification, the file name ends in one
/// of the configured extensions, and its path relative to `root` matches
/// none of the exclude globs.
#[derive(Debug, Clone)]
pub struct EventFilter {
    root: PathBuf,
    /// Stored with the leading dot, e.g. `".py"`.
    suffixes: Vec<String>,
    exclude_patterns: Vec<String>,
    exclude: GlobSet,
}

impl EventFilter {
    /// Build a filter, rejecting blank extensions and malformed globs.
    pub fn new<E, X>(root: impl AsRef<Path>, extensions: E, exclude: X) -> Result<Self>
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        X: IntoIterator,
        X::Item: AsRef<str>,
    {
        let mut suffixes = Vec::new();
        for ext in extensions {
            match normalize_extension(ext.as_ref()) {
                Some(suffix) => suffixes.push(suffix),
                None => {
                    return Err(SupervisorError::ConfigError(format!(
                        "invalid extension {:?} in watch filter",
                        ext.as_ref()
                    )));
                }
            }
        }

        let exclude_patterns: Vec<String> =
            exclude.into_iter().map(|p| p.as_ref().to_string()).collect();
        let exclude = compile_globs(&exclude_patterns)?;

        Ok(Self {
            root: anchor_root(root.as_ref()),
            suffixes,
            exclude_patterns,
            exclude,
        })
    }

    /// Extension-only filter. Blank extensions are dropped.
    pub fn for_extensions<E>(root: impl AsRef<Path>, extensions: E) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            root: anchor_root(root.as_ref()),
            suffixes: extensions
                .into_iter()
                .filter_map(|e| normalize_extension(e.as_ref()))
                .collect(),
            exclude_patterns: Vec::new(),
            exclude: GlobSet::empty(),
        }
    }

    /// True if `event` should trigger a restart.
    pub fn qualifies(&self, event: &FileEvent) -> bool {
        event.kind == FileEventKind::Modified && self.matches_path(&event.path)
    }

    /// Extension and exclude check only, ignoring the event kind.
    pub fn matches_path(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        if !self.suffixes.iter().any(|s| name.ends_with(s.as_str())) {
            return false;
        }

        !self.is_excluded(path)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        if self.exclude_patterns.is_empty() {
            return false;
        }

        match relative_str(&self.root, path) {
            Some(rel) => self.exclude.is_match(rel),
            None => self.exclude.is_match(path),
        }
    }

    /// Configured extensions without the leading dot.
    pub fn extensions(&self) -> Vec<&str> {
        self.suffixes.iter().map(|s| &s[1..]).collect()
    }

    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// Absolute root that exclude globs are matched relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Events arrive with absolute, canonical paths, and the file may already be
/// gone by the time it is filtered. The root is resolved up front so a plain
/// prefix strip relates the two.
fn anchor_root(root: &Path) -> PathBuf {
    root.canonicalize()
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf())
}

/// `"py"`, `".py"` and `" .py "` all become `".py"`.
fn normalize_extension(raw: &str) -> Option<String> {
    let ext = raw.trim().trim_start_matches('.');
    if ext.is_empty() {
        None
    } else {
        Some(format!(".{ext}"))
    }
}

fn compile_globs(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            SupervisorError::ConfigError(format!("invalid exclude glob {:?}: {e}", pattern))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| SupervisorError::ConfigError(format!("building exclude globs: {e}")))
}
