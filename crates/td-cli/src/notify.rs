use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::warn;

pub trait Notifier {
    fn notify(&self, message: &str) -> Result<()>;
}

/// Desktop notifications through `notify-send`.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, message: &str) -> Result<()> {
        let program = which::which("notify-send").context("notify-send not found on PATH")?;
        let status = Command::new(program)
            .arg(message)
            .status()
            .context("run notify-send")?;
        if !status.success() {
            bail!("notify-send exited with {status}");
        }
        Ok(())
    }
}

/// Prints to stdout instead of raising a desktop notification.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) -> Result<()> {
        println!("{message}");
        Ok(())
    }
}

/// Delivery failures are logged and swallowed; callers never see them.
pub fn deliver(notifier: &dyn Notifier, message: &str) -> bool {
    match notifier.notify(message) {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "notification not delivered");
            false
        }
    }
}
