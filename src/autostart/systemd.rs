// ABOUTME: systemd backend: a forking unit that runs the startup script once the network is online

use std::path::Path;

use tracing::info;

use super::backend::{remove_all, write_artifact, BootService, ProvisionContext};
use super::error::AutostartError;
use super::script::StartupScript;

/// Unit that runs the startup script once the network is online.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemdService;

impl SystemdService {
    pub fn unit_content(script_path: &Path) -> String {
        format!(
            r#"[Unit]
Description=SPV Screen Session Autostart
After=multi-user.target
Wants=network-online.target
After=network-online.target

[Service]
Type=forking
User=root
ExecStart={script}
Restart=on-failure
RestartSec=5
RemainAfterExit=yes

[Install]
WantedBy=multi-user.target
"#,
            script = script_path.display()
        )
    }
}

impl BootService for SystemdService {
    fn install(&self, ctx: &ProvisionContext<'_>, script: &StartupScript) -> Result<(), AutostartError> {
        let unit_path = ctx.config.systemd_unit_path();
        let unit = format!("{}.service", ctx.config.service_name);

        write_artifact(&unit_path, &Self::unit_content(&script.path), 0o644)?;
        ctx.run_required("systemctl", &["daemon-reload"])?;
        ctx.run_required("systemctl", &["enable", &unit])?;

        info!("Installed systemd unit {}", unit_path.display());
        Ok(())
    }

    fn remove(&self, ctx: &ProvisionContext<'_>) -> Result<(), AutostartError> {
        let unit_path = ctx.config.systemd_unit_path();
        let unit = format!("{}.service", ctx.config.service_name);

        ctx.run_best_effort("systemctl", &["stop", &unit]);
        ctx.run_best_effort("systemctl", &["disable", &unit]);
        let removed = remove_all(&[&unit_path, &ctx.config.host.script_path]);
        ctx.run_best_effort("systemctl", &["daemon-reload"]);

        info!("Removed systemd unit {}", unit_path.display());
        removed
    }
}
