// ABOUTME: Metadata store persisting session metadata and the autostart set as JSON arrays
// Each collection is a whole-file read-modify-write; a missing file reads as empty

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::models::MetadataEntry;

/// I/O or JSON failure on a metadata file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed metadata file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Which of the two persisted collections an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    Sessions,
    Autostart,
}

/// JSON-file store for session metadata and the autostart set.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    sessions_file: PathBuf,
    autostart_file: PathBuf,
}

impl MetadataStore {
    pub fn new(sessions_file: PathBuf, autostart_file: PathBuf) -> Self {
        Self {
            sessions_file,
            autostart_file,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sessions_file(), config.autostart_file())
    }

    pub fn path(&self, kind: MetadataKind) -> &Path {
        match kind {
            MetadataKind::Sessions => &self.sessions_file,
            MetadataKind::Autostart => &self.autostart_file,
        }
    }

    /// All entries in file order. A missing file, or a literal `null`, is an empty collection.
    pub fn list(&self, kind: MetadataKind) -> Result<Vec<MetadataEntry>, StoreError> {
        let path = self.path(kind);
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries: Option<Vec<MetadataEntry>> =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(entries.unwrap_or_default())
    }

    pub fn find(&self, kind: MetadataKind, name: &str) -> Result<Option<MetadataEntry>, StoreError> {
        Ok(self.list(kind)?.into_iter().find(|entry| entry.name == name))
    }

    pub fn contains(&self, kind: MetadataKind, name: &str) -> Result<bool, StoreError> {
        Ok(self.find(kind, name)?.is_some())
    }

    pub fn append(&self, kind: MetadataKind, entry: MetadataEntry) -> Result<(), StoreError> {
        let mut entries = self.list(kind)?;
        entries.push(entry);
        self.write_all(kind, &entries)
    }

    /// Drop every entry called `name` and return what remains.
    pub fn remove_by_name(&self, kind: MetadataKind, name: &str) -> Result<Vec<MetadataEntry>, StoreError> {
        let mut entries = self.list(kind)?;
        entries.retain(|entry| entry.name != name);
        self.write_all(kind, &entries)?;
        Ok(entries)
    }

    /// Overwrite the whole collection.
    pub fn write_all(&self, kind: MetadataKind, entries: &[MetadataEntry]) -> Result<(), StoreError> {
        let path = self.path(kind);
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)?;
        debug!("Wrote {} entries to {}", entries.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> MetadataStore {
        MetadataStore::new(
            dir.path().join("sessions.json"),
            dir.path().join("autostart.json"),
        )
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.list(MetadataKind::Sessions).unwrap().is_empty());
        assert!(store.list(MetadataKind::Autostart).unwrap().is_empty());
    }

    #[test]
    fn test_append_then_remove() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .append(MetadataKind::Sessions, MetadataEntry::new("build", "make", "builder"))
            .unwrap();
        store
            .append(MetadataKind::Sessions, MetadataEntry::new("web", "shell", "web shell"))
            .unwrap();

        let remaining = store.remove_by_name(MetadataKind::Sessions, "build").unwrap();
        assert_eq!(remaining, vec![MetadataEntry::new("web", "shell", "web shell")]);
        assert_eq!(store.list(MetadataKind::Sessions).unwrap(), remaining);
        // the other collection is untouched
        assert!(!dir.path().join("autostart.json").exists());
    }

    #[test]
    fn test_null_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(dir.path().join("autostart.json"), "null").unwrap();
        assert!(store.list(MetadataKind::Autostart).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(dir.path().join("sessions.json"), "{not json").unwrap();

        let err = store.list(MetadataKind::Sessions).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        // appending must not clobber the unreadable file
        assert!(store
            .append(MetadataKind::Sessions, MetadataEntry::new("a", "shell", ""))
            .is_err());
        assert_eq!(
            fs::read_to_string(dir.path().join("sessions.json")).unwrap(),
            "{not json"
        );
    }

    #[test]
    fn test_write_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(
            dir.path().join("nested/sessions.json"),
            dir.path().join("nested/autostart.json"),
        );
        store
            .append(MetadataKind::Autostart, MetadataEntry::new("build", "make", ""))
            .unwrap();
        assert!(store.contains(MetadataKind::Autostart, "build").unwrap());
    }
}
