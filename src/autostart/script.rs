// ABOUTME: Startup script generation for autostart-flagged sessions
// The script is a pure function of the flagged entries: one `screen -dmS` line per session

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use shell_escape::unix::escape;

use super::backend::write_artifact;
use super::error::AutostartError;
use crate::models::MetadataEntry;
use crate::screen::ScreenSession;

/// Seconds the boot script waits before launching, so the network and login services settle.
pub const BOOT_DELAY_SECS: u32 = 15;

/// The generated shell script that relaunches flagged sessions after boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupScript {
    pub path: PathBuf,
    launch_lines: Vec<String>,
}

impl StartupScript {
    pub fn generate(prefix: &str, sessions: &[MetadataEntry], path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            launch_lines: sessions
                .iter()
                .map(|session| launch_line(prefix, session))
                .collect(),
        }
    }

    pub fn launch_lines(&self) -> &[String] {
        &self.launch_lines
    }

    pub fn render(&self) -> String {
        let mut script = format!("#!/bin/bash\nsleep {}\n\n", BOOT_DELAY_SECS);
        for line in &self.launch_lines {
            script.push_str(line);
            script.push('\n');
        }
        script.push_str("\nexit 0\n");
        script
    }

    /// Write the script with executable permissions, replacing any previous version.
    pub fn install(&self) -> Result<(), AutostartError> {
        write_artifact(&self.path, &self.render(), 0o755)
    }
}

/// `screen -dmS <prefix>_<name>` with the stored command kept open in bash, if any.
pub fn launch_line(prefix: &str, session: &MetadataEntry) -> String {
    let full_name = ScreenSession::full_name(prefix, &session.name);
    let mut line = format!("screen -dmS {}", escape(Cow::from(full_name.as_str())));
    if !session.is_shell() {
        let wrapped = ScreenSession::keep_open(&session.command);
        line.push_str(" bash -c ");
        line.push_str(&escape(Cow::from(wrapped.as_str())));
    }
    line
}

/// Shell pipeline that quits every session carrying the managed prefix.
pub fn stop_sessions_command(prefix: &str) -> String {
    format!(
        "screen -ls | awk '/\\.{}_/ {{print $1}}' | xargs -r -I {{}} screen -S {{}} -X quit",
        prefix
    )
}
