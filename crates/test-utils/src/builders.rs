use std::path::{Path, PathBuf};
use std::time::Duration;

use watchrun::config::SupervisorConfig;
use watchrun::engine::Supervisor;
use watchrun::types::{CommandLine, WatchTarget};
use watchrun::watch::EventFilter;

use crate::fake_launcher::FakeLauncher;
use crate::fake_notifier::FakeNotifier;

/// Builder for `SupervisorConfig` to simplify test setup.
///
/// Defaults: `echo hi`, recursive, `.py` files, 200ms stop timeout, no
/// debounce.
pub struct SupervisorConfigBuilder {
    command: Vec<String>,
    dir: PathBuf,
    recursive: bool,
    extensions: Vec<String>,
    exclude: Vec<String>,
    stop_timeout: Duration,
    debounce: Duration,
}

impl SupervisorConfigBuilder {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            command: vec!["echo".to_string(), "hi".to_string()],
            dir: dir.as_ref().to_path_buf(),
            recursive: true,
            extensions: vec!["py".to_string()],
            exclude: Vec::new(),
            stop_timeout: Duration::from_millis(200),
            debounce: Duration::ZERO,
        }
    }

    pub fn command(mut self, parts: &[&str]) -> Self {
        self.command = parts.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn recursive(mut self, val: bool) -> Self {
        self.recursive = val;
        self
    }

    pub fn extensions(mut self, exts: &[&str]) -> Self {
        self.extensions = exts.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.exclude.push(pattern.to_string());
        self
    }

    pub fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    pub fn debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    pub fn build(self) -> SupervisorConfig {
        let filter = EventFilter::new(&self.dir, &self.extensions, &self.exclude)
            .expect("Failed to build event filter from builder");

        SupervisorConfig::new(
            CommandLine::new(self.command),
            WatchTarget::new(self.dir, self.recursive),
        )
        .with_filter(filter)
        .with_stop_timeout(self.stop_timeout)
        .with_debounce(self.debounce)
    }
}

/// A supervisor over fresh fakes, plus test-side handles to those fakes.
pub fn fake_supervisor(
    config: SupervisorConfig,
) -> (Supervisor<FakeLauncher, FakeNotifier>, FakeLauncher, FakeNotifier) {
    let launcher = FakeLauncher::new();
    let notifier = FakeNotifier::new();
    let supervisor = Supervisor::new(config, launcher.clone(), notifier.clone());
    (supervisor, launcher, notifier)
}
