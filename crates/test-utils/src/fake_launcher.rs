use std::collections::BTreeSet;
use std::io;
use std::sync::{Arc, Mutex};

use watchrun::errors::{Result, SupervisorError};
use watchrun::exec::{BoxFuture, ManagedChild, ProcessLauncher};
use watchrun::types::{ChildExit, CommandLine};

/// How the next fake children react to being stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChildBehaviour {
    /// Exits on the termination signal.
    #[default]
    Obedient,
    /// Ignores the termination signal, dies on kill.
    IgnoresTerm,
    /// Survives both terminate and kill.
    Unkillable,
    /// Has already exited by the time anyone looks at it.
    ExitsImmediately,
}

#[derive(Debug, Default)]
struct LauncherState {
    next_pid: u32,
    live: BTreeSet<u32>,
    max_live: usize,
    spawned: Vec<u32>,
    terminated: Vec<u32>,
    killed: Vec<u32>,
    commands: Vec<CommandLine>,
    pending_failures: usize,
    behaviour: ChildBehaviour,
}

impl LauncherState {
    fn mark_exited(&mut self, pid: u32) {
        self.live.remove(&pid);
    }
}

/// A launcher that hands out fake children and records everything.
///
/// Clones share state, so a test can keep one handle while the supervisor
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct FakeLauncher {
    state: Arc<Mutex<LauncherState>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` launches fail with a spawn error.
    pub fn fail_next_spawns(&self, n: usize) {
        self.state.lock().unwrap().pending_failures = n;
    }

    /// Behaviour for children launched from now on.
    pub fn set_child_behaviour(&self, behaviour: ChildBehaviour) {
        self.state.lock().unwrap().behaviour = behaviour;
    }

    pub fn live(&self) -> Vec<u32> {
        self.state.lock().unwrap().live.iter().copied().collect()
    }

    pub fn live_count(&self) -> usize {
        self.state.lock().unwrap().live.len()
    }

    /// Highest number of simultaneously live children ever observed.
    pub fn max_live(&self) -> usize {
        self.state.lock().unwrap().max_live
    }

    pub fn spawned(&self) -> Vec<u32> {
        self.state.lock().unwrap().spawned.clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.state.lock().unwrap().spawned.len()
    }

    pub fn terminated(&self) -> Vec<u32> {
        self.state.lock().unwrap().terminated.clone()
    }

    pub fn killed(&self) -> Vec<u32> {
        self.state.lock().unwrap().killed.clone()
    }

    pub fn commands(&self) -> Vec<CommandLine> {
        self.state.lock().unwrap().commands.clone()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&mut self, command: &CommandLine) -> Result<Box<dyn ManagedChild>> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(command.clone());

        if state.pending_failures > 0 {
            state.pending_failures -= 1;
            return Err(SupervisorError::SpawnError {
                command: command.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "fake: command not found"),
            });
        }

        state.next_pid += 1;
        let pid = 1000 + state.next_pid;
        let behaviour = state.behaviour;
        state.spawned.push(pid);

        let exited = behaviour == ChildBehaviour::ExitsImmediately;
        if !exited {
            state.live.insert(pid);
            state.max_live = state.max_live.max(state.live.len());
        }

        Ok(Box::new(FakeChild {
            pid,
            behaviour,
            exited,
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakeChild {
    pid: u32,
    behaviour: ChildBehaviour,
    exited: bool,
    state: Arc<Mutex<LauncherState>>,
}

impl FakeChild {
    fn exit(&mut self) {
        self.exited = true;
        self.state.lock().unwrap().mark_exited(self.pid);
    }

    fn exit_status(&self) -> ChildExit {
        ChildExit { code: None }
    }
}

impl ManagedChild for FakeChild {
    fn id(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn try_wait(&mut self) -> Result<Option<ChildExit>> {
        Ok(self.exited.then(|| self.exit_status()))
    }

    fn terminate(&mut self) -> Result<()> {
        self.state.lock().unwrap().terminated.push(self.pid);
        if self.behaviour == ChildBehaviour::Obedient {
            self.exit();
        }
        Ok(())
    }

    fn kill(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.state.lock().unwrap().killed.push(self.pid);
            if self.behaviour != ChildBehaviour::Unkillable {
                self.exit();
            }
            Ok(())
        })
    }

    fn wait(&mut self) -> BoxFuture<'_, Result<ChildExit>> {
        Box::pin(async move {
            if !self.exited {
                // Nothing else can change this child while we hold `&mut self`.
                std::future::pending::<()>().await;
            }
            Ok(self.exit_status())
        })
    }
}

impl Drop for FakeChild {
    // Mirrors `kill_on_drop(true)` on real children.
    fn drop(&mut self) {
        if !self.exited && self.behaviour != ChildBehaviour::Unkillable {
            if let Ok(mut state) = self.state.lock() {
                state.mark_exited(self.pid);
            }
        }
    }
}
