// ABOUTME: Session data models: the live session view and the metadata persisted per session name
// SessionRecord is rebuilt on every discovery; MetadataEntry is what lands on disk

use serde::{Deserialize, Serialize};

/// Sentinel command meaning "plain interactive shell".
pub const DEFAULT_COMMAND: &str = "shell";

pub const DEFAULT_SHELL_DESCRIPTION: &str = "A standard interactive shell session.";
pub const DEFAULT_COMMAND_DESCRIPTION: &str = "A screen session running a custom command.";

/// Attachment state reported by `screen -ls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Attached,
    Detached,
    Unknown,
}

impl SessionStatus {
    /// Map a `screen -ls` status keyword found anywhere in a listing line.
    pub fn from_listing_line(line: &str) -> Self {
        if line.contains("Attached") {
            Self::Attached
        } else if line.contains("Detached") {
            Self::Detached
        } else {
            Self::Unknown
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Attached => "●",
            Self::Detached => "○",
            Self::Unknown => "?",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Attached => "attached",
            Self::Detached => "detached",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One managed session as currently reported by the multiplexer, merged with metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Multiplexer instance id (the pid part of `pid.name`), empty if unknown.
    pub id: String,
    /// User-facing name with the session prefix stripped.
    pub name: String,
    pub status: SessionStatus,
    pub command: String,
    pub description: String,
    pub autostart: bool,
}

impl SessionRecord {
    pub fn is_shell(&self) -> bool {
        is_shell_command(&self.command)
    }
}

/// Persisted per-name metadata. Also used as the element type of the autostart set,
/// where `description` is optional and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub name: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub description: String,
}

impl MetadataEntry {
    pub fn new(name: impl Into<String>, command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            description: description.into(),
        }
    }

    pub fn is_shell(&self) -> bool {
        is_shell_command(&self.command)
    }
}

/// Blank commands and the `shell` sentinel both mean "no trailing command".
pub fn is_shell_command(command: &str) -> bool {
    let trimmed = command.trim();
    trimmed.is_empty() || trimmed == DEFAULT_COMMAND
}
