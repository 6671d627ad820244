// src/engine/mod.rs

//! Supervision engine for watchrun.
//!
//! - [`state`]: the supervisor lifecycle states.
//! - [`supervisor`]: owns the child process and the notifier; implements
//!   start / restart / stop and the qualifying-event check.
//! - [`runtime`]: the single-consumer event loop that feeds file changes and
//!   shutdown requests into the supervisor.

use crate::types::FileEvent;

/// Events flowing into the runtime from the notifier and signal handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// Something changed under the watched directory.
    FileChanged(FileEvent),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod runtime;
pub mod state;
pub mod supervisor;

pub use runtime::Runtime;
pub use state::SupervisorState;
pub use supervisor::{Supervisor, KILL_GRACE};
