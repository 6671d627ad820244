// src/exec/launcher.rs

//! Pluggable process launching.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::types::{ChildExit, CommandLine};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capability to start a process from a command line.
pub trait ProcessLauncher: Send {
    /// Spawn `command`. Failing to start must yield `SupervisorError::SpawnError`.
    fn launch(&mut self, command: &CommandLine) -> Result<Box<dyn ManagedChild>>;
}

/// A running (or finished but not yet observed) child process.
pub trait ManagedChild: Send {
    /// OS process id, if the process has not been reaped yet.
    fn id(&self) -> Option<u32>;

    /// Non-blocking exit check.
    fn try_wait(&mut self) -> Result<Option<ChildExit>>;

    /// Ask the process to exit (SIGTERM on Unix). Does not wait.
    fn terminate(&mut self) -> Result<()>;

    /// Forcefully kill the process.
    fn kill(&mut self) -> BoxFuture<'_, Result<()>>;

    /// Resolve once the process has exited.
    fn wait(&mut self) -> BoxFuture<'_, Result<ChildExit>>;
}
