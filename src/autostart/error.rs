// ABOUTME: Error types for boot-time autostart provisioning

use std::path::PathBuf;

use thiserror::Error;

use crate::system::InitSystem;

/// Why boot-time provisioning could not be applied.
#[derive(Debug, Error)]
pub enum AutostartError {
    #[error("autostart is not supported on {0}")]
    UnsupportedOs(String),

    #[error("unsupported init system for autostart: {0}")]
    UnsupportedInitSystem(InitSystem),

    #[error("no SysVinit registration tool known for distribution '{0}'")]
    UnsupportedDistribution(String),

    #[error("failed to write {path}: {source}")]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {path}: {source}")]
    RemoveArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed: {reason}")]
    ServiceCommand { command: String, reason: String },
}
