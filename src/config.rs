// ABOUTME: Application configuration and path context, built once at startup and passed down
// Holds the config directory layout, session prefix, host artifact paths, and the persisted theme

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::components::theme::{Theme, DEFAULT_THEME};

pub const DEFAULT_PREFIX: &str = "spv";
pub const DEFAULT_SERVICE_NAME: &str = "spv-autostart";

/// Failure reading or writing `config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode config: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where boot-time artifacts live on the host, and where the system probe looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
    pub script_path: PathBuf,
    pub systemd_unit_dir: PathBuf,
    pub init_d_dir: PathBuf,
    pub probe_root: PathBuf,
}

impl Default for HostPaths {
    fn default() -> Self {
        Self {
            script_path: PathBuf::from("/usr/local/bin/spv-autostart.sh"),
            systemd_unit_dir: PathBuf::from("/etc/systemd/system"),
            init_d_dir: PathBuf::from("/etc/init.d"),
            probe_root: PathBuf::from("/"),
        }
    }
}

impl HostPaths {
    /// Every artifact and probe path rooted under `root`, for sandboxed runs.
    pub fn under(root: &Path) -> Self {
        Self {
            script_path: root.join("usr/local/bin/spv-autostart.sh"),
            systemd_unit_dir: root.join("etc/systemd/system"),
            init_d_dir: root.join("etc/init.d"),
            probe_root: root.to_path_buf(),
        }
    }
}

/// On-disk shape of `config.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_interval_secs: Option<u64>,
}

/// Runtime settings: the metadata directory, session prefix, service name and theme.
#[derive(Debug, Clone)]
pub struct Config {
    pub config_dir: PathBuf,
    pub session_prefix: String,
    pub service_name: String,
    pub theme: String,
    pub refresh_interval: Duration,
    pub host: HostPaths,
}

impl Config {
    /// Defaults rooted at `config_dir`, without reading anything from disk.
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            session_prefix: DEFAULT_PREFIX.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            theme: DEFAULT_THEME.to_string(),
            refresh_interval: Duration::from_secs(1),
            host: HostPaths::default(),
        }
    }

    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(".config").join("spv"))
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Load `~/.config/spv/config.json`, creating the directory if needed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_dir()?)
    }

    pub fn load_from(config_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::with_dir(config_dir);
        fs::create_dir_all(&config.config_dir).map_err(|source| ConfigError::Io {
            path: config.config_dir.clone(),
            source,
        })?;

        let file = config.read_file();
        if let Some(theme) = file.theme {
            if Theme::by_name(&theme).is_some() {
                config.theme = theme;
            } else {
                warn!("Unknown theme '{}' in config, using {}", theme, DEFAULT_THEME);
            }
        }
        if let Some(secs) = file.refresh_interval_secs.filter(|secs| *secs > 0) {
            config.refresh_interval = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn sessions_file(&self) -> PathBuf {
        self.config_dir.join("sessions.json")
    }

    pub fn autostart_file(&self) -> PathBuf {
        self.config_dir.join("autostart.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    pub fn systemd_unit_path(&self) -> PathBuf {
        self.host
            .systemd_unit_dir
            .join(format!("{}.service", self.service_name))
    }

    pub fn init_script_path(&self) -> PathBuf {
        self.host.init_d_dir.join(&self.service_name)
    }

    /// Persist the theme choice, keeping any other settings already in the file.
    pub fn save_theme(&mut self, name: &str) -> Result<(), ConfigError> {
        if Theme::by_name(name).is_none() {
            return Err(ConfigError::UnknownTheme(name.to_string()));
        }

        let mut file = self.read_file();
        file.theme = Some(name.to_string());
        let path = self.config_file();
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&path, json).map_err(|source| ConfigError::Io { path, source })?;
        self.theme = name.to_string();
        Ok(())
    }

    // Unreadable or malformed config falls back to defaults.
    fn read_file(&self) -> ConfigFile {
        let path = self.config_file();
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring malformed config {}: {}", path.display(), e);
                ConfigFile::default()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => ConfigFile::default(),
            Err(e) => {
                warn!("Failed to read config {}: {}", path.display(), e);
                ConfigFile::default()
            }
        }
    }
}
