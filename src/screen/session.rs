// ABOUTME: ScreenSession command builders for managed GNU screen sessions
// Provides creation, termination, listing, and attach targets for prefixed session names

use std::io::ErrorKind;

use tracing::{debug, info, warn};

use super::error::ScreenError;
use super::runner::{args, CommandOutput, CommandRunner};
use crate::models::session::is_shell_command;

pub const SCREEN_BIN: &str = "screen";

/// A managed screen session identified by its full, prefixed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSession {
    pub name: String,
    pub command: Option<String>,
}

impl ScreenSession {
    pub fn new(prefix: &str, name: &str, command: &str) -> Self {
        Self {
            name: Self::full_name(prefix, name),
            command: if is_shell_command(command) {
                None
            } else {
                Some(command.to_string())
            },
        }
    }

    /// `<prefix>_<name>`, the name screen knows the session by.
    pub fn full_name(prefix: &str, name: &str) -> String {
        format!("{}_{}", prefix, name)
    }

    /// Wrap a command so the shell stays open after it exits.
    pub fn keep_open(command: &str) -> String {
        format!("{}; exec bash", command)
    }

    /// Arguments for a detached launch: `-dmS <name> [bash -c "<cmd>; exec bash"]`.
    pub fn launch_args(&self) -> Vec<String> {
        let mut launch = args(["-dmS", self.name.as_str()]);
        if let Some(command) = &self.command {
            launch.extend(args(["bash", "-c"]));
            launch.push(Self::keep_open(command));
        }
        launch
    }

    /// Launch the session detached. Any failure means no session exists afterwards.
    pub fn create(runner: &dyn CommandRunner, prefix: &str, name: &str, command: &str) -> Result<Self, ScreenError> {
        let session = Self::new(prefix, name, command);
        let output = runner
            .run(SCREEN_BIN, &session.launch_args())
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ScreenError::ScreenNotInstalled,
                _ => ScreenError::IoError(e),
            })?;

        if !output.success() {
            let reason = output.combined().trim().to_string();
            return Err(ScreenError::LaunchFailed {
                name: session.name,
                reason: if reason.is_empty() {
                    format!("exit status {:?}", output.status_code)
                } else {
                    reason
                },
            });
        }

        info!("Created screen session {}", session.name);
        Ok(session)
    }

    /// Ask screen to terminate a session. Best effort: the session may already be gone.
    pub fn quit(runner: &dyn CommandRunner, full_name: &str) {
        match runner.run(SCREEN_BIN, &args(["-S", full_name, "-X", "quit"])) {
            Ok(output) if output.success() => debug!("Terminated screen session {}", full_name),
            Ok(output) => debug!(
                "screen quit for {} exited with {:?}, ignoring",
                full_name, output.status_code
            ),
            Err(e) => warn!("Failed to run screen quit for {}: {}", full_name, e),
        }
    }

    /// Raw `screen -ls` output. `None` when screen cannot be spawned at all.
    pub fn list(runner: &dyn CommandRunner) -> Option<CommandOutput> {
        match runner.run(SCREEN_BIN, &args(["-ls"])) {
            Ok(output) => Some(output),
            Err(e) => {
                warn!("Failed to list screen sessions: {}", e);
                None
            }
        }
    }

    /// Target for `screen -r`: `<id>.<prefix>_<name>`, or just the full name when the id is unknown.
    pub fn attach_target(id: &str, prefix: &str, name: &str) -> String {
        let full = Self::full_name(prefix, name);
        if id.is_empty() {
            full
        } else {
            format!("{}.{}", id, full)
        }
    }
}
