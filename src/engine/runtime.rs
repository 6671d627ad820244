// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, trace};

use crate::errors::Result;
use crate::exec::ProcessLauncher;
use crate::watch::ChangeNotifier;

use super::supervisor::Supervisor;
use super::RuntimeEvent;

/// How a debounce window ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BurstEnd {
    Settled,
    Shutdown,
}

/// Drives a started [`Supervisor`] from a single event channel.
///
/// The notifier thread and the Ctrl-C handler only ever push into the
/// channel; this loop is the sole consumer and the sole owner of the
/// supervisor, so restarts are strictly sequential.
pub struct Runtime<L: ProcessLauncher, N: ChangeNotifier> {
    supervisor: Supervisor<L, N>,
    event_rx: mpsc::UnboundedReceiver<RuntimeEvent>,
    debounce: Duration,
}

impl<L: ProcessLauncher, N: ChangeNotifier> fmt::Debug for Runtime<L, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("supervisor", &self.supervisor)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

impl<L: ProcessLauncher, N: ChangeNotifier> Runtime<L, N> {
    pub fn new(
        supervisor: Supervisor<L, N>,
        event_rx: mpsc::UnboundedReceiver<RuntimeEvent>,
    ) -> Self {
        let debounce = supervisor.config().debounce;
        Self {
            supervisor,
            event_rx,
            debounce,
        }
    }

    /// Main event loop.
    ///
    /// - Qualifying file changes restart the child (after the debounce
    ///   window, if one is configured).
    /// - Spawn failures are logged and the loop keeps waiting.
    /// - `ShutdownRequested`, a closed channel, or a fatal error ends the
    ///   loop; the supervisor is stopped in every case.
    pub async fn run(mut self) -> Result<()> {
        info!("watchrun runtime started");

        let outcome = self.event_loop().await;
        let stopped = self.supervisor.stop().await;

        info!("runtime exiting");
        outcome.and(stopped)
    }

    async fn event_loop(&mut self) -> Result<()> {
        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    return Ok(());
                }
            };

            let change = match event {
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested");
                    return Ok(());
                }
                RuntimeEvent::FileChanged(change) => change,
            };

            if !self.supervisor.is_qualifying(&change) {
                trace!(path = ?change.path, kind = ?change.kind, "ignoring change");
                continue;
            }

            if !self.debounce.is_zero() && self.drain_burst().await == BurstEnd::Shutdown {
                info!("shutdown requested during debounce window");
                return Ok(());
            }

            match self.supervisor.on_file_event(&change).await {
                Ok(_) => {}
                Err(err) if err.is_recoverable() => {
                    error!(error = %err, "restart failed; waiting for the next change");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Swallow further events for one debounce window.
    ///
    /// The window is fixed from the first qualifying change; it does not
    /// extend while events keep arriving.
    async fn drain_burst(&mut self) -> BurstEnd {
        let deadline = tokio::time::sleep(self.debounce);
        tokio::pin!(deadline);

        let mut coalesced = 0usize;
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                next = self.event_rx.recv() => match next {
                    Some(RuntimeEvent::FileChanged(change)) => {
                        if self.supervisor.is_qualifying(&change) {
                            coalesced += 1;
                        }
                    }
                    Some(RuntimeEvent::ShutdownRequested) | None => return BurstEnd::Shutdown,
                },
            }
        }

        if coalesced > 0 {
            debug!(coalesced, window = ?self.debounce, "coalesced burst of changes");
        }
        BurstEnd::Settled
    }
}
