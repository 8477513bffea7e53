// ABOUTME: Error types for screen session management
// Defines error conditions that can occur when launching or listing host screen sessions

use thiserror::Error;

/// Failure talking to the `screen` binary.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("screen is not installed on host")]
    ScreenNotInstalled,

    #[error("failed to create screen session {name}: {reason}")]
    LaunchFailed { name: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
