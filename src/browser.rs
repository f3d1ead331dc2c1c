use color_eyre::eyre::{eyre, Result};
use tokio::process::Command;

fn opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    }
}

/// Hands `url` to the platform opener without waiting for it to exit.
pub fn open(url: &str) -> Result<()> {
    let (cmd, args) = opener();
    Command::new(cmd)
        .args(args)
        .arg(url)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| eyre!("Failed to open browser with {cmd}: {e}"))?;
    Ok(())
}
