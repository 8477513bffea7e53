// ABOUTME: Read-only probe of OS family, Linux distribution, and active init system
// Missing files and paths are never errors; they just fall through to "unknown"

use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref OS_RELEASE_ID: Regex = Regex::new(r#"(?m)^ID=["']?([^"'\r\n]*)["']?\s*$"#).unwrap();
    static ref OS_RELEASE_ID_LIKE: Regex =
        Regex::new(r#"(?m)^ID_LIKE=["']?([^"'\r\n]*)["']?\s*$"#).unwrap();
}

/// Marker files checked in order when os-release has no usable ID.
const DISTRO_MARKERS: [(&str, &str); 5] = [
    ("etc/redhat-release", "rhel"),
    ("etc/debian_version", "debian"),
    ("etc/arch-release", "arch"),
    ("etc/gentoo-release", "gentoo"),
    ("etc/alpine-release", "alpine"),
];

/// Operating system the binary is running on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    MacOs,
    Other(String),
}

impl OsFamily {
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Self::Linux,
            "macos" | "darwin" => Self::MacOs,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Other(os) => os,
        }
    }
}

/// Init system detected from marker paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitSystem {
    Systemd,
    OpenRc,
    Upstart,
    SysVinit,
    Launchd,
    Unknown,
}

impl InitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Systemd => "systemd",
            Self::OpenRc => "openrc",
            Self::Upstart => "upstart",
            Self::SysVinit => "sysvinit",
            Self::Launchd => "launchd",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for InitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which service registration tool a SysVinit host uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistroFamily {
    Debian,
    RedHat,
    Other,
}

impl DistroFamily {
    pub fn from_id(id: &str) -> Self {
        match id {
            "debian" | "ubuntu" => Self::Debian,
            "rhel" | "centos" | "fedora" => Self::RedHat,
            _ => Self::Other,
        }
    }
}

/// What the detector found about the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub os: OsFamily,
    pub distribution: String,
    /// Parent distributions from os-release `ID_LIKE`, closest first.
    pub id_like: Vec<String>,
    pub init_system: InitSystem,
}

impl SystemInfo {
    pub fn linux(distribution: &str, init_system: InitSystem) -> Self {
        Self {
            os: OsFamily::Linux,
            distribution: distribution.to_string(),
            id_like: Vec::new(),
            init_system,
        }
    }

    pub fn with_id_like<I, S>(mut self, id_like: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id_like = id_like.into_iter().map(Into::into).collect();
        self
    }

    /// Family of the distribution itself, else of the first `ID_LIKE` parent that has one.
    pub fn distro_family(&self) -> DistroFamily {
        std::iter::once(&self.distribution)
            .chain(&self.id_like)
            .map(|id| DistroFamily::from_id(id))
            .find(|family| *family != DistroFamily::Other)
            .unwrap_or(DistroFamily::Other)
    }

    /// Boot-time automation is only implemented for Linux.
    pub fn supports_autostart(&self) -> bool {
        self.os == OsFamily::Linux
    }
}

impl std::fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.os.as_str(), self.distribution, self.init_system)
    }
}

/// Probes marker files under a root directory, `/` on a real host.
#[derive(Debug, Clone)]
pub struct SystemDetector {
    root: PathBuf,
    os: String,
}

impl Default for SystemDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemDetector {
    pub fn new() -> Self {
        Self::with_root("/", std::env::consts::OS)
    }

    /// Probe marker files under `root` as if running on `os`.
    pub fn with_root(root: impl Into<PathBuf>, os: &str) -> Self {
        Self {
            root: root.into(),
            os: os.to_string(),
        }
    }

    pub fn detect(&self) -> SystemInfo {
        match OsFamily::from_os(&self.os) {
            OsFamily::Linux => {
                let os_release = fs::read_to_string(self.path("etc/os-release")).unwrap_or_default();
                SystemInfo {
                    os: OsFamily::Linux,
                    distribution: self.detect_distribution(&os_release),
                    id_like: parse_os_release_id_like(&os_release),
                    init_system: self.detect_init_system(),
                }
            }
            OsFamily::MacOs => SystemInfo {
                os: OsFamily::MacOs,
                distribution: "macOS".to_string(),
                id_like: Vec::new(),
                init_system: InitSystem::Launchd,
            },
            other => SystemInfo {
                os: other,
                distribution: "unknown".to_string(),
                id_like: Vec::new(),
                init_system: InitSystem::Unknown,
            },
        }
    }

    fn detect_distribution(&self, os_release: &str) -> String {
        if let Some(id) = parse_os_release_id(os_release) {
            return id;
        }

        DISTRO_MARKERS
            .iter()
            .find(|(marker, _)| self.path(marker).exists())
            .map_or_else(|| "unknown".to_string(), |(_, distro)| (*distro).to_string())
    }

    fn detect_init_system(&self) -> InitSystem {
        if self.path("run/systemd/system").exists() {
            InitSystem::Systemd
        } else if self.path("sbin/openrc").exists() {
            InitSystem::OpenRc
        } else if self.path("etc/init").exists() {
            InitSystem::Upstart
        } else if self.path("etc/init.d").exists() {
            InitSystem::SysVinit
        } else {
            InitSystem::Unknown
        }
    }

    fn path(&self, relative: &str) -> PathBuf {
        Path::new(&self.root).join(relative)
    }
}

/// The `ID=` value of an os-release file, unquoted.
pub fn parse_os_release_id(content: &str) -> Option<String> {
    OS_RELEASE_ID
        .captures(content)
        .map(|caps| caps[1].to_string())
        .filter(|id| !id.is_empty())
}

/// The space-separated `ID_LIKE=` list of an os-release file.
pub fn parse_os_release_id_like(content: &str) -> Vec<String> {
    OS_RELEASE_ID_LIKE
        .captures(content)
        .map(|caps| caps[1].split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_parse_os_release_id() {
        let content = "NAME=\"Ubuntu\"\nVERSION_ID=\"24.04\"\nID=ubuntu\nID_LIKE=debian\n";
        assert_eq!(parse_os_release_id(content), Some("ubuntu".to_string()));
        assert_eq!(parse_os_release_id("ID=\"fedora\"\n"), Some("fedora".to_string()));
        assert_eq!(parse_os_release_id("ID_LIKE=debian\n"), None);
    }

    #[test]
    fn test_parse_os_release_id_like() {
        let rocky = "NAME=\"Rocky Linux\"\nID=\"rocky\"\nID_LIKE=\"rhel centos fedora\"\n";
        assert_eq!(parse_os_release_id_like(rocky), vec!["rhel", "centos", "fedora"]);
        assert_eq!(parse_os_release_id_like("ID=debian\n"), Vec::<String>::new());
    }

    #[test]
    fn test_family_falls_back_to_id_like() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("etc/init.d")).unwrap();
        fs::write(
            root.path().join("etc/os-release"),
            "ID=linuxmint\nID_LIKE=\"ubuntu debian\"\n",
        )
        .unwrap();

        let info = SystemDetector::with_root(root.path(), "linux").detect();
        assert_eq!(
            info,
            SystemInfo::linux("linuxmint", InitSystem::SysVinit).with_id_like(["ubuntu", "debian"])
        );
        assert_eq!(info.distro_family(), DistroFamily::Debian);
        assert_eq!(
            SystemInfo::linux("slackware", InitSystem::SysVinit).distro_family(),
            DistroFamily::Other
        );
    }

    #[test]
    fn test_detects_systemd_and_os_release() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("run/systemd/system")).unwrap();
        fs::create_dir_all(root.path().join("etc/init.d")).unwrap();
        fs::write(root.path().join("etc/os-release"), "ID=debian\n").unwrap();

        let info = SystemDetector::with_root(root.path(), "linux").detect();
        assert_eq!(info, SystemInfo::linux("debian", InitSystem::Systemd));
        assert_eq!(info.distro_family(), DistroFamily::Debian);
    }

    #[test]
    fn test_probe_order_openrc_before_sysvinit() {
        let root = TempDir::new().unwrap();
        touch(root.path(), "sbin/openrc");
        fs::create_dir_all(root.path().join("etc/init.d")).unwrap();
        touch(root.path(), "etc/alpine-release");

        let info = SystemDetector::with_root(root.path(), "linux").detect();
        assert_eq!(info.init_system, InitSystem::OpenRc);
        assert_eq!(info.distribution, "alpine");
    }

    #[test]
    fn test_upstart_then_sysvinit() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("etc/init.d")).unwrap();
        let detector = SystemDetector::with_root(root.path(), "linux");
        assert_eq!(detector.detect().init_system, InitSystem::SysVinit);

        fs::create_dir_all(root.path().join("etc/init")).unwrap();
        assert_eq!(detector.detect().init_system, InitSystem::Upstart);
    }

    #[test]
    fn test_empty_root_is_unknown() {
        let root = TempDir::new().unwrap();
        let info = SystemDetector::with_root(root.path(), "linux").detect();
        assert_eq!(info, SystemInfo::linux("unknown", InitSystem::Unknown));
    }

    #[test]
    fn test_non_linux_fixed_results() {
        let root = TempDir::new().unwrap();
        let mac = SystemDetector::with_root(root.path(), "macos").detect();
        assert_eq!(mac.init_system, InitSystem::Launchd);
        assert!(!mac.supports_autostart());

        let windows = SystemDetector::with_root(root.path(), "windows").detect();
        assert_eq!(windows.os, OsFamily::Other("windows".to_string()));
        assert_eq!(windows.init_system, InitSystem::Unknown);
    }
}
