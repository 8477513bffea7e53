// ABOUTME: Hands the terminal over to `screen -r` for an attached session and takes it back afterwards
// No polling happens while attached; the caller redraws once control returns

use std::io::stdout;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::info;

use crate::screen::session::SCREEN_BIN;

/// Run `screen -r <target>` in the foreground with the real terminal.
pub fn attach_session(target: &str) -> Result<()> {
    info!("Attaching to screen session {}", target);

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    let status = Command::new(SCREEN_BIN)
        .args(["-r", target])
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status();

    // Restore the TUI before reporting anything
    execute!(stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;

    let status = status.with_context(|| format!("failed to run screen -r {}", target))?;
    if !status.success() {
        bail!("screen -r {} exited with {}", target, status);
    }

    info!("Detached from screen session {}", target);
    Ok(())
}
