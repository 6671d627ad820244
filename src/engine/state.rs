// src/engine/state.rs

use std::fmt;

/// Lifecycle of a [`Supervisor`](super::Supervisor).
///
/// ```text
/// Idle --start--> Watching --event--> Restarting --> Watching --stop--> Stopped
/// ```
///
/// `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupervisorState {
    #[default]
    Idle,
    Watching,
    Restarting,
    Stopped,
}

impl SupervisorState {
    /// Whether file events are acted upon in this state.
    pub fn accepts_events(self) -> bool {
        self == SupervisorState::Watching
    }

    pub fn is_terminal(self) -> bool {
        self == SupervisorState::Stopped
    }
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SupervisorState::Idle => "idle",
            SupervisorState::Watching => "watching",
            SupervisorState::Restarting => "restarting",
            SupervisorState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}
