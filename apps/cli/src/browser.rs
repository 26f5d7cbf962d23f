//! Opening the finished report with the platform's default handler.

use std::path::Path;
use std::process::{Command, Stdio};

use color_eyre::eyre::{Result, eyre};

/// Launch the system opener for `path` without waiting for it.
pub(crate) fn open_in_browser(path: &Path) -> Result<()> {
    let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut command = opener_command(&target);

    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| eyre!("failed to launch browser for {}: {e}", target.display()))?;

    Ok(())
}

fn opener_command(target: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("rundll32");
        cmd.arg("url.dll,FileProtocolHandler").arg(target);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(target);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(target);
        cmd
    }
}
