// ABOUTME: Autostart provisioning: derive the boot script and init-system artifact from the flagged sessions
// An empty flagged set tears everything down; a non-empty one (re)installs it idempotently

pub mod backend;
pub mod error;
pub mod openrc;
pub mod script;
pub mod systemd;
pub mod sysvinit;

pub use backend::{AutostartBackend, BootService, ProvisionContext};
pub use error::AutostartError;
pub use script::StartupScript;

use tracing::{info, warn};

use crate::config::Config;
use crate::models::MetadataEntry;
use crate::screen::CommandRunner;
use crate::system::SystemInfo;

/// Installs or tears down boot-time configuration for the flagged sessions.
pub struct AutostartProvisioner<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a Config,
}

impl<'a> AutostartProvisioner<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a Config) -> Self {
        Self { runner, config }
    }

    /// Bring the host's boot configuration in line with `sessions`.
    ///
    /// Installation stops at the first failing step and may leave some
    /// artifacts written. Teardown ignores service-manager failures and
    /// reports only files it could not delete.
    pub fn apply(&self, sessions: &[MetadataEntry], system: &SystemInfo) -> Result<(), AutostartError> {
        if !system.supports_autostart() {
            return Err(AutostartError::UnsupportedOs(system.os.as_str().to_string()));
        }
        let backend = AutostartBackend::for_init_system(system.init_system)
            .ok_or(AutostartError::UnsupportedInitSystem(system.init_system))?;

        let ctx = ProvisionContext {
            runner: self.runner,
            config: self.config,
            system,
        };

        if sessions.is_empty() {
            info!("No autostart sessions, removing {} configuration", system.init_system);
            return backend.service().remove(&ctx);
        }

        backend.service().check_supported(system)?;
        warn_if_not_root();
        let script = StartupScript::generate(
            &self.config.session_prefix,
            sessions,
            &self.config.host.script_path,
        );
        script.install()?;
        backend.service().install(&ctx, &script)?;

        info!(
            "Provisioned {} autostart session(s) via {}",
            sessions.len(),
            system.init_system
        );
        Ok(())
    }
}

fn warn_if_not_root() {
    if !nix::unistd::geteuid().is_root() {
        warn!("Not running as root; writing boot configuration will likely fail");
    }
}
