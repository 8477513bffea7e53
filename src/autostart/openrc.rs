// ABOUTME: OpenRC backend: an openrc-run script that launches the sessions inline and quits them on stop

use tracing::info;

use super::backend::{remove_all, write_artifact, BootService, ProvisionContext};
use super::error::AutostartError;
use super::script::{stop_sessions_command, StartupScript};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenRcService;

impl OpenRcService {
    pub fn rc_script_content(service_name: &str, prefix: &str, script: &StartupScript) -> String {
        let mut launch = String::new();
        for line in script.launch_lines() {
            launch.push_str("    ");
            launch.push_str(line);
            launch.push('\n');
        }

        format!(
            r#"#!/sbin/openrc-run

name="{name}"
description="SPV Screen Session Autostart"

depend() {{
    need net
    after bootmisc
}}

start() {{
    ebegin "Starting SPV autostart sessions"
{launch}    eend $?
}}

stop() {{
    ebegin "Stopping SPV sessions"
    {stop}
    eend $?
}}
"#,
            name = service_name,
            launch = launch,
            stop = stop_sessions_command(prefix),
        )
    }
}

impl BootService for OpenRcService {
    fn install(&self, ctx: &ProvisionContext<'_>, script: &StartupScript) -> Result<(), AutostartError> {
        let config = ctx.config;
        let service = config.service_name.as_str();
        let rc_path = config.init_script_path();

        write_artifact(
            &rc_path,
            &Self::rc_script_content(service, &config.session_prefix, script),
            0o755,
        )?;

        // rc-update warns and may exit nonzero when the service is already in the runlevel
        let runlevel_link = config.host.probe_root.join("etc/runlevels/default").join(service);
        if runlevel_link.exists() {
            info!("{} already in default runlevel", service);
        } else {
            ctx.run_required("rc-update", &["add", service, "default"])?;
        }

        info!("Installed OpenRC script {}", rc_path.display());
        Ok(())
    }

    fn remove(&self, ctx: &ProvisionContext<'_>) -> Result<(), AutostartError> {
        let config = ctx.config;
        let service = config.service_name.as_str();
        let rc_path = config.init_script_path();

        ctx.run_best_effort("rc-service", &[service, "stop"]);
        ctx.run_best_effort("rc-update", &["del", service, "default"]);

        info!("Removed OpenRC script {}", rc_path.display());
        remove_all(&[&rc_path, &config.host.script_path])
    }
}
