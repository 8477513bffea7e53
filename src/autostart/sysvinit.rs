// ABOUTME: SysVinit backend: an LSB init script wrapping the startup script, registered per distro family

use std::path::Path;

use tracing::info;

use super::backend::{remove_all, write_artifact, BootService, ProvisionContext};
use super::error::AutostartError;
use super::script::{stop_sessions_command, StartupScript};
use crate::system::{DistroFamily, SystemInfo};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SysVinitService;

impl SysVinitService {
    pub fn init_script_content(service_name: &str, prefix: &str, script_path: &Path) -> String {
        format!(
            r#"#!/bin/sh
# chkconfig: 2345 99 10
# description: SPV Screen Session Autostart
### BEGIN INIT INFO
# Provides: {name}
# Required-Start: $remote_fs $syslog $network
# Required-Stop: $remote_fs $syslog
# Default-Start: 2 3 4 5
# Default-Stop: 0 1 6
# Short-Description: SPV Screen Session Autostart
# Description: Starts the screen sessions flagged for autostart by spv
### END INIT INFO

NAME="{name}"
DAEMON="{daemon}"

start() {{
    echo "Starting $NAME"
    "$DAEMON" >/dev/null 2>&1 &
}}

stop() {{
    echo "Stopping $NAME"
    {stop}
}}

status() {{
    if screen -ls 2>/dev/null | grep -q '\.{prefix}_'; then
        echo "$NAME: sessions running"
        return 0
    fi
    echo "$NAME: no sessions running"
    return 3
}}

case "$1" in
    start)
        start
        ;;
    stop)
        stop
        ;;
    restart)
        stop
        start
        ;;
    status)
        status
        ;;
    *)
        echo "Usage: $0 {{start|stop|restart|status}}"
        exit 1
        ;;
esac
exit $?
"#,
            name = service_name,
            daemon = script_path.display(),
            stop = stop_sessions_command(prefix),
            prefix = prefix,
        )
    }
}

impl BootService for SysVinitService {
    fn check_supported(&self, system: &SystemInfo) -> Result<(), AutostartError> {
        match system.distro_family() {
            DistroFamily::Debian | DistroFamily::RedHat => Ok(()),
            DistroFamily::Other => Err(AutostartError::UnsupportedDistribution(system.distribution.clone())),
        }
    }

    fn install(&self, ctx: &ProvisionContext<'_>, script: &StartupScript) -> Result<(), AutostartError> {
        let config = ctx.config;
        let service = config.service_name.as_str();
        let init_path = config.init_script_path();

        write_artifact(
            &init_path,
            &Self::init_script_content(service, &config.session_prefix, &script.path),
            0o755,
        )?;

        match ctx.system.distro_family() {
            DistroFamily::Debian => ctx.run_required("update-rc.d", &[service, "defaults"])?,
            DistroFamily::RedHat => {
                ctx.run_required("chkconfig", &["--add", service])?;
                ctx.run_required("chkconfig", &[service, "on"])?;
            }
            DistroFamily::Other => {
                return Err(AutostartError::UnsupportedDistribution(ctx.system.distribution.clone()));
            }
        }

        info!("Installed SysVinit script {}", init_path.display());
        Ok(())
    }

    fn remove(&self, ctx: &ProvisionContext<'_>) -> Result<(), AutostartError> {
        let config = ctx.config;
        let service = config.service_name.as_str();
        let init_path = config.init_script_path();

        ctx.run_best_effort("service", &[service, "stop"]);
        match ctx.system.distro_family() {
            DistroFamily::Debian => ctx.run_best_effort("update-rc.d", &["-f", service, "remove"]),
            DistroFamily::RedHat => ctx.run_best_effort("chkconfig", &["--del", service]),
            DistroFamily::Other => {}
        }

        info!("Removed SysVinit script {}", init_path.display());
        remove_all(&[&init_path, &config.host.script_path])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::InitSystem;

    #[test]
    fn test_check_supported_by_family() {
        let service = SysVinitService;
        assert!(service
            .check_supported(&SystemInfo::linux("debian", InitSystem::SysVinit))
            .is_ok());
        assert!(service
            .check_supported(&SystemInfo::linux("rocky", InitSystem::SysVinit).with_id_like(["rhel", "fedora"]))
            .is_ok());
        assert!(matches!(
            service.check_supported(&SystemInfo::linux("slackware", InitSystem::SysVinit)),
            Err(AutostartError::UnsupportedDistribution(distro)) if distro == "slackware"
        ));
    }

    #[test]
    fn test_init_script_references_startup_script() {
        let content = SysVinitService::init_script_content(
            "spv-autostart",
            "spv",
            Path::new("/usr/local/bin/spv-autostart.sh"),
        );
        assert!(content.contains("# Provides: spv-autostart"));
        assert!(content.contains("DAEMON=\"/usr/local/bin/spv-autostart.sh\""));
        for action in ["start)", "stop)", "restart)", "status)"] {
            assert!(content.contains(action), "missing action {}", action);
        }
        assert!(content.contains("{start|stop|restart|status}"));
        assert!(content.contains("grep -q '\\.spv_'"));
    }
}
