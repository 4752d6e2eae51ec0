//! Server lifecycle state.

use serde::Serialize;
use std::fmt;

/// Lifecycle of the managed server process.
///
/// ```text
/// Stopped --start()--> Starting --grace + probe--> Running
/// Running --stop()--> Stopping --exit observed--> Stopped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerState {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl ServerState {
    /// States in which a process handle is owned.
    pub fn is_active(self) -> bool {
        matches!(self, ServerState::Starting | ServerState::Running)
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServerState::Stopped => "stopped",
            ServerState::Starting => "starting",
            ServerState::Running => "running",
            ServerState::Stopping => "stopping",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stopped() {
        assert_eq!(ServerState::default(), ServerState::Stopped);
    }

    #[test]
    fn test_is_active() {
        assert!(ServerState::Starting.is_active());
        assert!(ServerState::Running.is_active());
        assert!(!ServerState::Stopped.is_active());
        assert!(!ServerState::Stopping.is_active());
    }

    #[test]
    fn test_display_and_serde_agree() {
        for state in [
            ServerState::Stopped,
            ServerState::Starting,
            ServerState::Running,
            ServerState::Stopping,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state));
        }
    }
}
