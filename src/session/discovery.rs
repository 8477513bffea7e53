// ABOUTME: Session discovery reconciling live `screen -ls` output with persisted metadata
// Parsing is a pure function over captured text so it can be tested against literal listings

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::persistence::{MetadataKind, MetadataStore};
use crate::models::session::DEFAULT_SHELL_DESCRIPTION;
use crate::models::{MetadataEntry, SessionRecord, SessionStatus, DEFAULT_COMMAND};
use crate::screen::{CommandOutput, CommandRunner, ScreenSession};

/// Text screen prints alongside a listing even when it exits nonzero ("No Sockets found").
const LISTING_MARKER: &str = "socket";

/// A managed session as screen reports it, before metadata is merged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedSession {
    pub id: String,
    pub name: String,
    pub status: SessionStatus,
}

/// screen exits nonzero when there is nothing to list, so a failed run still
/// counts as a listing if the marker shows up in its output.
pub fn is_listing_output(output: &CommandOutput) -> bool {
    output.success() || output.combined().to_lowercase().contains(LISTING_MARKER)
}

/// Extract managed sessions from raw `screen -ls` text, in listing order.
///
/// A line describes a session only if it has a `.` and an Attached/Detached
/// keyword. The first field is split on its first `.` into id and name;
/// names without `<prefix>_` belong to someone else and are skipped.
pub fn parse_listing(output: &str, prefix: &str) -> Vec<ListedSession> {
    let managed_prefix = format!("{}_", prefix);

    output
        .lines()
        .map(str::trim)
        .filter(|line| line.contains('.') && (line.contains("Attached") || line.contains("Detached")))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let token = fields.next()?;
            fields.next()?;

            let (id, full_name) = token.split_once('.').unwrap_or(("", token));
            let name = full_name.strip_prefix(&managed_prefix)?;
            if name.is_empty() {
                return None;
            }

            Some(ListedSession {
                id: id.to_string(),
                name: name.to_string(),
                status: SessionStatus::from_listing_line(line),
            })
        })
        .collect()
}

/// Merge listed sessions with metadata and autostart flags, keyed by stripped name.
pub fn reconcile(
    listed: Vec<ListedSession>,
    metadata: &[MetadataEntry],
    autostart: &[MetadataEntry],
) -> Vec<SessionRecord> {
    let by_name: HashMap<&str, &MetadataEntry> =
        metadata.iter().map(|entry| (entry.name.as_str(), entry)).collect();
    let flagged: HashSet<&str> = autostart.iter().map(|entry| entry.name.as_str()).collect();

    listed
        .into_iter()
        .map(|session| {
            let (command, description) = by_name.get(session.name.as_str()).map_or_else(
                || (DEFAULT_COMMAND.to_string(), DEFAULT_SHELL_DESCRIPTION.to_string()),
                |entry| (entry.command.clone(), entry.description.clone()),
            );
            let autostart = flagged.contains(session.name.as_str());

            SessionRecord {
                id: session.id,
                name: session.name,
                status: session.status,
                command,
                description,
                autostart,
            }
        })
        .collect()
}

/// Lists live managed sessions and joins them with stored metadata.
pub struct SessionDiscovery<'a> {
    runner: &'a dyn CommandRunner,
    store: &'a MetadataStore,
    prefix: &'a str,
}

impl<'a> SessionDiscovery<'a> {
    pub fn new(runner: &'a dyn CommandRunner, store: &'a MetadataStore, prefix: &'a str) -> Self {
        Self {
            runner,
            store,
            prefix,
        }
    }

    /// Current view of managed sessions. Never fails: a missing screen binary
    /// yields an empty view, and unreadable metadata falls back to defaults.
    pub fn discover(&self) -> Vec<SessionRecord> {
        let listed = match ScreenSession::list(self.runner) {
            Some(output) if is_listing_output(&output) => parse_listing(&output.combined(), self.prefix),
            Some(output) => {
                debug!(
                    "screen -ls exited with {:?} and no listing marker",
                    output.status_code
                );
                Vec::new()
            }
            None => Vec::new(),
        };

        let metadata = self.load(MetadataKind::Sessions);
        let autostart = self.load(MetadataKind::Autostart);
        reconcile(listed, &metadata, &autostart)
    }

    fn load(&self, kind: MetadataKind) -> Vec<MetadataEntry> {
        self.store.list(kind).unwrap_or_else(|e| {
            warn!("Using defaults for {:?} metadata: {}", kind, e);
            Vec::new()
        })
    }
}
