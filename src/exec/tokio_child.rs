// src/exec/tokio_child.rs

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::errors::{Result, SupervisorError};
use crate::exec::launcher::{BoxFuture, ManagedChild, ProcessLauncher};
use crate::types::{ChildExit, CommandLine};

/// Launches real OS processes with inherited stdio.
#[derive(Debug, Clone, Default)]
pub struct TokioLauncher;

impl TokioLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for TokioLauncher {
    fn launch(&mut self, command: &CommandLine) -> Result<Box<dyn ManagedChild>> {
        let program = command.program().ok_or_else(|| {
            SupervisorError::ConfigError("command must not be empty".to_string())
        })?;

        let mut cmd = Command::new(program);
        cmd.args(command.args()).kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| SupervisorError::SpawnError {
            command: command.to_string(),
            source,
        })?;

        info!(pid = ?child.id(), command = %command, "child process started");
        Ok(Box::new(TokioChild { child }))
    }
}

/// [`ManagedChild`] over a `tokio::process::Child`.
#[derive(Debug)]
pub struct TokioChild {
    child: Child,
}

impl ManagedChild for TokioChild {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    fn try_wait(&mut self) -> Result<Option<ChildExit>> {
        Ok(self.child.try_wait()?.map(ChildExit::from))
    }

    fn terminate(&mut self) -> Result<()> {
        let Some(pid) = self.child.id() else {
            debug!("terminate requested for already reaped child");
            return Ok(());
        };
        send_terminate(&mut self.child, pid)
    }

    fn kill(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.child.kill().await?;
            Ok(())
        })
    }

    fn wait(&mut self) -> BoxFuture<'_, Result<ChildExit>> {
        Box::pin(async move {
            let status = self.child.wait().await?;
            Ok(ChildExit::from(status))
        })
    }
}

#[cfg(unix)]
fn send_terminate(_child: &mut Child, pid: u32) -> Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let raw = i32::try_from(pid)
        .map_err(|_| SupervisorError::InvalidState(format!("pid {pid} out of range")))?;

    match kill(Pid::from_raw(raw), Signal::SIGTERM) {
        // Exited between `id()` and the signal; the caller's wait reaps it.
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(SupervisorError::IoError(std::io::Error::from(errno))),
    }
}

#[cfg(not(unix))]
fn send_terminate(child: &mut Child, _pid: u32) -> Result<()> {
    // No graceful signal available; fall back to an immediate kill.
    child.start_kill()?;
    Ok(())
}
