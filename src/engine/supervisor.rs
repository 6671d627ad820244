// src/engine/supervisor.rs

//! The file-watch supervisor.
//!
//! A [`Supervisor`] owns at most one child process at a time. Every operation
//! takes `&mut self`, so the single owner (the runtime loop) is the only place
//! restarts can happen and two children can never be spawned concurrently.
//!
//! Termination is bounded: the child gets `stop_timeout` to exit after the
//! graceful signal, then it is killed and gets [`KILL_GRACE`] to be reaped.

use std::fmt;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error, info, trace, warn};

use crate::config::{check_command, check_watch_dir, SupervisorConfig};
use crate::engine::state::SupervisorState;
use crate::errors::{Result, SupervisorError};
use crate::exec::{ManagedChild, ProcessLauncher};
use crate::types::{ChildExit, FileEvent};
use crate::watch::{ChangeNotifier, EventSink};

/// How long a force-killed child has to disappear before we give up.
pub const KILL_GRACE: Duration = Duration::from_secs(2);

pub struct Supervisor<L: ProcessLauncher, N: ChangeNotifier> {
    config: SupervisorConfig,
    launcher: L,
    notifier: N,
    child: Option<Box<dyn ManagedChild>>,
    state: SupervisorState,
    restarts: u64,
}

impl<L: ProcessLauncher, N: ChangeNotifier> fmt::Debug for Supervisor<L, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("command", &self.config.command)
            .field("target", &self.config.target)
            .field("state", &self.state)
            .field("child_pid", &self.child_id())
            .field("restarts", &self.restarts)
            .finish_non_exhaustive()
    }
}

impl<L: ProcessLauncher, N: ChangeNotifier> Supervisor<L, N> {
    pub fn new(config: SupervisorConfig, launcher: L, notifier: N) -> Self {
        Self {
            config,
            launcher,
            notifier,
            child: None,
            state: SupervisorState::Idle,
            restarts: 0,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// PID of the current child, if one is held.
    pub fn child_id(&self) -> Option<u32> {
        self.child.as_ref().and_then(|c| c.id())
    }

    pub fn has_child(&self) -> bool {
        self.child.is_some()
    }

    /// Completed restart cycles (initial launch not included).
    pub fn restart_count(&self) -> u64 {
        self.restarts
    }

    /// Whether `event` would trigger a restart under the configured filter.
    pub fn is_qualifying(&self, event: &FileEvent) -> bool {
        self.config.filter.qualifies(event)
    }

    /// Validate the configuration, begin watching and launch the child once.
    ///
    /// Invalid command or watch directory fails with `ConfigError` before the
    /// notifier is touched. A failed initial launch is logged; the supervisor
    /// still starts watching and retries on the next qualifying change.
    pub fn start(&mut self, sink: EventSink) -> Result<()> {
        if self.state != SupervisorState::Idle {
            return Err(SupervisorError::InvalidState(format!(
                "cannot start a supervisor that is {}",
                self.state
            )));
        }

        check_command(&self.config.command)?;
        check_watch_dir(&self.config.target.dir)?;

        self.notifier.watch(&self.config.target, sink)?;
        self.state = SupervisorState::Watching;
        info!(
            dir = ?self.config.target.dir,
            recursive = self.config.target.recursive,
            extensions = ?self.config.filter.extensions(),
            "watching for changes"
        );

        match self.spawn_child() {
            Ok(()) => Ok(()),
            Err(err) if err.is_recoverable() => {
                error!(error = %err, "initial launch failed; will retry on next change");
                Ok(())
            }
            Err(err) => {
                self.notifier.unwatch();
                self.state = SupervisorState::Idle;
                Err(err)
            }
        }
    }

    /// React to one change notification.
    ///
    /// Returns `Ok(true)` if the event qualified and the child was restarted.
    /// Events are ignored outside the `Watching` state.
    pub async fn on_file_event(&mut self, event: &FileEvent) -> Result<bool> {
        if !self.state.accepts_events() {
            debug!(state = %self.state, path = ?event.path, "ignoring event");
            return Ok(false);
        }

        if !self.is_qualifying(event) {
            trace!(path = ?event.path, kind = ?event.kind, "event does not qualify");
            return Ok(false);
        }

        info!(path = ?event.path, "restarting due to change");
        self.restart().await?;
        Ok(true)
    }

    /// Stop the current child (if any) and launch a fresh one.
    ///
    /// With no child running this simply launches. If the launch fails the
    /// supervisor keeps its previous state and holds no child.
    pub async fn restart(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Err(SupervisorError::InvalidState(
                "cannot restart a stopped supervisor".to_string(),
            ));
        }

        let resume = self.state;
        self.state = SupervisorState::Restarting;
        let result = self.restart_cycle().await;
        self.state = resume;
        result
    }

    async fn restart_cycle(&mut self) -> Result<()> {
        let previous = self.child_id();
        self.terminate_child().await?;
        self.spawn_child()?;
        self.restarts += 1;
        debug!(?previous, current = ?self.child_id(), restarts = self.restarts, "restart complete");
        Ok(())
    }

    /// Terminate the child, stop watching, and enter `Stopped`.
    ///
    /// Calling it again is a no-op.
    pub async fn stop(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Ok(());
        }

        self.notifier.unwatch();
        let result = self.terminate_child().await;
        self.state = SupervisorState::Stopped;
        info!(restarts = self.restarts, "supervisor stopped");
        result
    }

    fn spawn_child(&mut self) -> Result<()> {
        if self.child.is_some() {
            return Err(SupervisorError::InvalidState(
                "refusing to launch while a child is still held".to_string(),
            ));
        }
        let child = self.launcher.launch(&self.config.command)?;
        self.child = Some(child);
        Ok(())
    }

    /// Shut the held child down. The slot is only cleared once it has exited.
    async fn terminate_child(&mut self) -> Result<()> {
        let Some(child) = self.child.as_mut() else {
            return Ok(());
        };
        shutdown_child(&mut **child, self.config.stop_timeout).await?;
        self.child = None;
        Ok(())
    }
}

async fn shutdown_child(child: &mut dyn ManagedChild, stop_timeout: Duration) -> Result<ChildExit> {
    let pid = child.id();

    if let Some(exit) = child.try_wait()? {
        info!(?pid, code = ?exit.code, "child had already exited");
        return Ok(exit);
    }

    debug!(?pid, "sending termination signal");
    child.terminate()?;

    match timeout(stop_timeout, child.wait()).await {
        Ok(exit) => {
            let exit = exit?;
            info!(?pid, code = ?exit.code, "child process exited");
            return Ok(exit);
        }
        Err(_) => {
            warn!(?pid, timeout = ?stop_timeout, "child ignored termination signal; killing");
        }
    }

    match timeout(KILL_GRACE, force_kill(child)).await {
        Ok(exit) => {
            let exit = exit?;
            info!(?pid, code = ?exit.code, "child process killed");
            Ok(exit)
        }
        Err(_) => Err(SupervisorError::TerminationTimeout {
            pid,
            waited: stop_timeout + KILL_GRACE,
        }),
    }
}

async fn force_kill(child: &mut dyn ManagedChild) -> Result<ChildExit> {
    child.kill().await?;
    child.wait().await
}
