// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`launcher`] defines the `ProcessLauncher` / `ManagedChild` capabilities
//!   the supervisor is constructed with. Tests replace them with fakes.
//! - [`tokio_child`] is the production implementation over
//!   `tokio::process::Command`.

pub mod launcher;
pub mod tokio_child;

pub use launcher::{BoxFuture, ManagedChild, ProcessLauncher};
pub use tokio_child::{TokioChild, TokioLauncher};
