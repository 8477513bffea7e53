// ABOUTME: Init-system strategy seam for installing and removing the boot-time service artifact
// Required service commands short-circuit on failure; teardown commands are logged and ignored

use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tracing::{debug, warn};

use super::error::AutostartError;
use super::openrc::OpenRcService;
use super::script::StartupScript;
use super::systemd::SystemdService;
use super::sysvinit::SysVinitService;
use crate::config::Config;
use crate::screen::runner::args;
use crate::screen::CommandRunner;
use crate::system::{InitSystem, SystemInfo};

/// Everything a backend needs to touch the host.
pub struct ProvisionContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub config: &'a Config,
    pub system: &'a SystemInfo,
}

impl ProvisionContext<'_> {
    /// Run a service-manager command that must succeed for installation to continue.
    pub fn run_required(&self, program: &str, arguments: &[&str]) -> Result<(), AutostartError> {
        let command = format!("{} {}", program, arguments.join(" "));
        let output = self
            .runner
            .run(program, &args(arguments.iter().copied()))
            .map_err(|e| AutostartError::ServiceCommand {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if output.success() {
            debug!("{} succeeded", command);
            Ok(())
        } else {
            let detail = output.combined().trim().to_string();
            Err(AutostartError::ServiceCommand {
                command,
                reason: if detail.is_empty() {
                    format!("exit status {:?}", output.status_code)
                } else {
                    detail
                },
            })
        }
    }

    /// Run a teardown command whose failure must not stop the rest of the teardown,
    /// typically because the service is already stopped, disabled, or absent.
    pub fn run_best_effort(&self, program: &str, arguments: &[&str]) {
        let command = format!("{} {}", program, arguments.join(" "));
        match self.runner.run(program, &args(arguments.iter().copied())) {
            Ok(output) if output.success() => debug!("{} succeeded", command),
            Ok(output) => warn!("{} exited with {:?}, continuing", command, output.status_code),
            Err(e) => warn!("{} could not run: {}, continuing", command, e),
        }
    }
}

/// One init system's way of running the startup script at boot.
pub trait BootService {
    /// Refuse a host this backend cannot register on, before anything is written.
    fn check_supported(&self, _system: &SystemInfo) -> Result<(), AutostartError> {
        Ok(())
    }

    /// Write the init-system artifact for `script` and register it to run at boot.
    fn install(&self, ctx: &ProvisionContext<'_>, script: &StartupScript) -> Result<(), AutostartError>;

    /// Deregister and delete the artifact. Only file removal failures are reported.
    fn remove(&self, ctx: &ProvisionContext<'_>) -> Result<(), AutostartError>;
}

/// The init systems autostart knows how to provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutostartBackend {
    Systemd(SystemdService),
    SysVinit(SysVinitService),
    OpenRc(OpenRcService),
}

impl AutostartBackend {
    pub fn for_init_system(init_system: InitSystem) -> Option<Self> {
        match init_system {
            InitSystem::Systemd => Some(Self::Systemd(SystemdService)),
            InitSystem::SysVinit => Some(Self::SysVinit(SysVinitService)),
            InitSystem::OpenRc => Some(Self::OpenRc(OpenRcService)),
            InitSystem::Upstart | InitSystem::Launchd | InitSystem::Unknown => None,
        }
    }

    pub fn service(&self) -> &dyn BootService {
        match self {
            Self::Systemd(service) => service,
            Self::SysVinit(service) => service,
            Self::OpenRc(service) => service,
        }
    }
}

/// Overwrite `path` with `content` and set its mode, creating parent directories.
pub fn write_artifact(path: &Path, content: &str, mode: u32) -> Result<(), AutostartError> {
    let write_err = |source| AutostartError::WriteArtifact {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, content).map_err(write_err)?;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(write_err)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Delete `path`; an already-missing file counts as removed.
pub fn remove_artifact(path: &Path) -> Result<(), AutostartError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(AutostartError::RemoveArtifact {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Remove every path, then report the first failure if any.
pub fn remove_all(paths: &[&Path]) -> Result<(), AutostartError> {
    let mut first_error = None;
    for path in paths {
        if let Err(e) = remove_artifact(path) {
            warn!("{}", e);
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}
