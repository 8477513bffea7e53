// ABOUTME: Session lifecycle orchestration for managed screen sessions
// Keeps running sessions, persisted metadata, and boot-time configuration consistent

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::discovery::SessionDiscovery;
use super::persistence::{MetadataKind, MetadataStore, StoreError};
use crate::autostart::{AutostartError, AutostartProvisioner};
use crate::config::Config;
use crate::models::session::{DEFAULT_COMMAND_DESCRIPTION, DEFAULT_SHELL_DESCRIPTION};
use crate::models::{MetadataEntry, SessionRecord, DEFAULT_COMMAND};
use crate::screen::{CommandRunner, ScreenError, ScreenSession, SystemCommandRunner};
use crate::system::{SystemDetector, SystemInfo};

/// Failure of a lifecycle operation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),

    #[error("session '{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid session name '{0}'")]
    InvalidName(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Screen(#[from] ScreenError),

    #[error("Issue generating autostart configuration: {0}")]
    Autostart(#[from] AutostartError),
}

/// Session Lifecycle Controller: keeps running sessions, metadata, and boot configuration in step.
pub struct SessionManager {
    config: Config,
    store: MetadataStore,
    runner: Arc<dyn CommandRunner>,
    detector: SystemDetector,
}

impl SessionManager {
    pub fn new(config: Config) -> Self {
        let detector = SystemDetector::with_root(&config.host.probe_root, std::env::consts::OS);
        Self::with_parts(config, Arc::new(SystemCommandRunner), detector)
    }

    pub fn with_parts(config: Config, runner: Arc<dyn CommandRunner>, detector: SystemDetector) -> Self {
        let store = MetadataStore::from_config(&config);
        Self {
            config,
            store,
            runner,
            detector,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub fn system_info(&self) -> SystemInfo {
        self.detector.detect()
    }

    /// Fresh view of the managed sessions, in screen's listing order.
    pub fn discover(&self) -> Vec<SessionRecord> {
        SessionDiscovery::new(self.runner.as_ref(), &self.store, &self.config.session_prefix).discover()
    }

    /// Launch `<prefix>_<name>` and record its metadata. Nothing is written unless the launch succeeds.
    ///
    /// Names are unique among live sessions; metadata for a name with no live
    /// session is replaced.
    pub fn create(&self, name: &str, command: &str, description: &str) -> Result<(), SessionError> {
        let name = name.trim();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(SessionError::InvalidName(name.to_string()));
        }
        if self.discover().iter().any(|session| session.name == name) {
            return Err(SessionError::AlreadyExists(name.to_string()));
        }
        // Metadata left behind by a session that exited on its own
        if self.store.contains(MetadataKind::Sessions, name)? {
            info!("Dropping stale metadata for {}", name);
            self.store.remove_by_name(MetadataKind::Sessions, name)?;
        }

        let command = match command.trim() {
            "" => DEFAULT_COMMAND,
            trimmed => trimmed,
        };
        let description = match description.trim() {
            "" if command == DEFAULT_COMMAND => DEFAULT_SHELL_DESCRIPTION,
            "" => DEFAULT_COMMAND_DESCRIPTION,
            trimmed => trimmed,
        };

        ScreenSession::create(self.runner.as_ref(), &self.config.session_prefix, name, command)?;
        self.store
            .append(MetadataKind::Sessions, MetadataEntry::new(name, command, description))?;

        info!("Created session {} running {}", name, command);
        Ok(())
    }

    /// Terminate a session and forget it entirely, then re-provision autostart.
    pub fn kill(&self, name: &str) -> Result<Vec<SessionRecord>, SessionError> {
        let full_name = ScreenSession::full_name(&self.config.session_prefix, name);
        ScreenSession::quit(self.runner.as_ref(), &full_name);

        let mut metadata = self.store.list(MetadataKind::Sessions)?;
        let mut flagged = self.store.list(MetadataKind::Autostart)?;
        metadata.retain(|entry| entry.name != name);
        flagged.retain(|entry| entry.name != name);
        // Flags go first so a failed write never leaves a flag without its metadata
        self.store.write_all(MetadataKind::Autostart, &flagged)?;
        self.store.write_all(MetadataKind::Sessions, &metadata)?;
        info!("Killed session {}", name);

        let sessions = self.discover();
        // Nothing can have been provisioned on an OS without boot automation
        let system = self.system_info();
        if system.supports_autostart() {
            self.provision(&system)?;
        }
        Ok(sessions)
    }

    /// Flip autostart membership for `name` and re-provision the whole flagged set.
    pub fn toggle_autostart(&self, name: &str) -> Result<Vec<SessionRecord>, SessionError> {
        let system = self.system_info();
        if !system.supports_autostart() {
            return Err(AutostartError::UnsupportedOs(system.os.as_str().to_string()).into());
        }

        let entry = self
            .store
            .find(MetadataKind::Sessions, name)?
            .ok_or_else(|| SessionError::NotFound(name.to_string()))?;

        let mut flagged = self.store.list(MetadataKind::Autostart)?;
        let before = flagged.len();
        flagged.retain(|existing| existing.name != name);
        let enabled = flagged.len() == before;
        if enabled {
            flagged.push(entry);
        }
        self.store.write_all(MetadataKind::Autostart, &flagged)?;
        info!(
            "Autostart {} for session {}",
            if enabled { "enabled" } else { "disabled" },
            name
        );

        let sessions = self.discover();
        self.provision(&system)?;
        Ok(sessions)
    }

    /// The flagged set as the provisioner sees it: every autostart entry, with the
    /// command taken from session metadata when present.
    pub fn autostart_sessions(&self) -> Result<Vec<MetadataEntry>, SessionError> {
        let metadata = self.store.list(MetadataKind::Sessions)?;
        let flagged = self.store.list(MetadataKind::Autostart)?;

        Ok(flagged
            .into_iter()
            .map(|flag| {
                metadata
                    .iter()
                    .find(|entry| entry.name == flag.name)
                    .cloned()
                    .unwrap_or(flag)
            })
            .collect())
    }

    /// Re-apply boot configuration from the persisted sets.
    pub fn sync_autostart(&self) -> Result<(), SessionError> {
        self.provision(&self.system_info())
    }

    fn provision(&self, system: &SystemInfo) -> Result<(), SessionError> {
        let sessions = self.autostart_sessions()?;
        AutostartProvisioner::new(self.runner.as_ref(), &self.config)
            .apply(&sessions, system)
            .map_err(|e| {
                warn!("Autostart provisioning failed: {}", e);
                SessionError::Autostart(e)
            })
    }

    /// Argument for `screen -r` that reaches this session.
    pub fn attach_target(&self, session: &SessionRecord) -> String {
        ScreenSession::attach_target(&session.id, &self.config.session_prefix, &session.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostPaths;
    use crate::screen::{CommandOutput, MockCommandRunner};
    use tempfile::TempDir;

    fn manager_with(runner: MockCommandRunner, dir: &TempDir, os: &str) -> SessionManager {
        let mut config = Config::with_dir(dir.path().join("config"));
        config.host = HostPaths::under(dir.path());
        let detector = SystemDetector::with_root(dir.path(), os);
        SessionManager::with_parts(config, Arc::new(runner), detector)
    }

    const NO_SOCKETS: &str = "No Sockets found in /run/screen/S-root.\n";

    fn is_listing(args: &[String]) -> bool {
        args.first().map(String::as_str) == Some("-ls")
    }

    #[test]
    fn test_create_failure_writes_no_metadata() {
        let dir = TempDir::new().unwrap();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|_, args| is_listing(args))
            .times(1)
            .returning(|_, _| Ok(CommandOutput::failed(1, NO_SOCKETS)));
        runner
            .expect_run()
            .withf(|_, args| !is_listing(args))
            .times(1)
            .returning(|_, _| Ok(CommandOutput::failed(1, "cannot open terminal")));
        let manager = manager_with(runner, &dir, "linux");

        let result = manager.create("build", "make", "");
        assert!(matches!(result, Err(SessionError::Screen(ScreenError::LaunchFailed { .. }))));
        assert!(manager.store().list(MetadataKind::Sessions).unwrap().is_empty());
    }

    #[test]
    fn test_create_applies_default_descriptions() {
        let dir = TempDir::new().unwrap();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(4).returning(|_, args| {
            if is_listing(args) {
                Ok(CommandOutput::failed(1, NO_SOCKETS))
            } else {
                Ok(CommandOutput::ok(""))
            }
        });
        let manager = manager_with(runner, &dir, "linux");

        manager.create("irc", "", "").unwrap();
        manager.create("web", "npm start", " ").unwrap();

        assert_eq!(
            manager.store().list(MetadataKind::Sessions).unwrap(),
            vec![
                MetadataEntry::new("irc", "shell", DEFAULT_SHELL_DESCRIPTION),
                MetadataEntry::new("web", "npm start", DEFAULT_COMMAND_DESCRIPTION),
            ]
        );
    }

    #[test]
    fn test_create_rejects_bad_names() {
        let dir = TempDir::new().unwrap();
        let manager = manager_with(MockCommandRunner::new(), &dir, "linux");

        assert!(matches!(manager.create("  ", "", ""), Err(SessionError::InvalidName(_))));
        assert!(matches!(manager.create("two words", "", ""), Err(SessionError::InvalidName(_))));
    }

    #[test]
    fn test_create_rejects_name_of_live_session() {
        let dir = TempDir::new().unwrap();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|_, args| is_listing(args))
            .times(1)
            .returning(|_, _| {
                Ok(CommandOutput::failed(
                    1,
                    "There is a screen on:\n\t4242.spv_build\t(Detached)\n1 Socket in /run/screen/S-root.\n",
                ))
            });
        let manager = manager_with(runner, &dir, "linux");

        let result = manager.create("build", "make", "");
        assert!(matches!(result, Err(SessionError::AlreadyExists(_))));
        assert!(manager.store().list(MetadataKind::Sessions).unwrap().is_empty());
    }

    #[test]
    fn test_create_replaces_metadata_of_exited_session() {
        let dir = TempDir::new().unwrap();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(2).returning(|_, args| {
            if is_listing(args) {
                Ok(CommandOutput::failed(1, NO_SOCKETS))
            } else {
                Ok(CommandOutput::ok(""))
            }
        });
        let manager = manager_with(runner, &dir, "linux");
        manager
            .store()
            .append(MetadataKind::Sessions, MetadataEntry::new("build", "make", "old"))
            .unwrap();

        manager.create("build", "make watch", "new").unwrap();

        assert_eq!(
            manager.store().list(MetadataKind::Sessions).unwrap(),
            vec![MetadataEntry::new("build", "make watch", "new")]
        );
    }

    #[test]
    fn test_toggle_unknown_session_is_not_found() {
        let dir = TempDir::new().unwrap();
        let manager = manager_with(MockCommandRunner::new(), &dir, "linux");

        let result = manager.toggle_autostart("ghost");
        assert!(matches!(result, Err(SessionError::NotFound(_))));
        assert!(!manager.config().autostart_file().exists());
    }

    #[test]
    fn test_toggle_on_unsupported_os_leaves_flags_alone() {
        let dir = TempDir::new().unwrap();
        let manager = manager_with(MockCommandRunner::new(), &dir, "macos");
        manager
            .store()
            .append(MetadataKind::Sessions, MetadataEntry::new("build", "make", ""))
            .unwrap();

        let result = manager.toggle_autostart("build");
        assert!(matches!(
            result,
            Err(SessionError::Autostart(AutostartError::UnsupportedOs(_)))
        ));
        assert!(manager.store().list(MetadataKind::Autostart).unwrap().is_empty());
    }

    #[test]
    fn test_kill_on_unsupported_os_forgets_session_without_provisioning() {
        let dir = TempDir::new().unwrap();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(2).returning(|_, args| {
            if args.first().map(String::as_str) == Some("-ls") {
                Ok(CommandOutput::failed(1, "No Sockets found in /run/screen/S-root.\n"))
            } else {
                Ok(CommandOutput::ok(""))
            }
        });
        let manager = manager_with(runner, &dir, "macos");
        let store = manager.store();
        store
            .append(MetadataKind::Sessions, MetadataEntry::new("build", "make", ""))
            .unwrap();
        store
            .append(MetadataKind::Autostart, MetadataEntry::new("build", "make", ""))
            .unwrap();

        let sessions = manager.kill("build").unwrap();
        assert!(sessions.is_empty());
        assert!(store.list(MetadataKind::Sessions).unwrap().is_empty());
        assert!(store.list(MetadataKind::Autostart).unwrap().is_empty());
    }

    #[test]
    fn test_kill_keeps_session_metadata_when_flags_cannot_be_updated() {
        let dir = TempDir::new().unwrap();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_, _| Ok(CommandOutput::ok("")));
        let manager = manager_with(runner, &dir, "linux");
        manager
            .store()
            .append(MetadataKind::Sessions, MetadataEntry::new("build", "make", ""))
            .unwrap();
        // A directory where the flag file belongs makes every autostart write fail
        std::fs::create_dir_all(manager.config().autostart_file()).unwrap();

        let result = manager.kill("build");

        assert!(matches!(result, Err(SessionError::Store(_))));
        assert_eq!(
            manager.store().list(MetadataKind::Sessions).unwrap(),
            vec![MetadataEntry::new("build", "make", "")]
        );
    }

    #[test]
    fn test_autostart_sessions_prefers_metadata_command() {
        let dir = TempDir::new().unwrap();
        let manager = manager_with(MockCommandRunner::new(), &dir, "linux");
        let store = manager.store();
        store
            .append(MetadataKind::Sessions, MetadataEntry::new("build", "make watch", "builder"))
            .unwrap();
        store
            .append(MetadataKind::Autostart, MetadataEntry::new("orphan", "top", ""))
            .unwrap();
        store
            .append(MetadataKind::Autostart, MetadataEntry::new("build", "make", ""))
            .unwrap();

        assert_eq!(
            manager.autostart_sessions().unwrap(),
            vec![
                MetadataEntry::new("orphan", "top", ""),
                MetadataEntry::new("build", "make watch", "builder"),
            ]
        );
    }
}
