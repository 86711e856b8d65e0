use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = ".td.log";

/// Logs go to `{vault}/.td.log` so they never draw over the TUI.
///
/// The filter comes from `TD_LOG` (default `warn`). Falls back to stderr when
/// the log file cannot be opened.
pub fn init(vault_root: &Path) {
    let filter = EnvFilter::try_from_env("TD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    let log_path = vault_root.join(LOG_FILE);
    let result = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).try_init(),
        Err(_) => builder.with_writer(std::io::stderr).try_init(),
    };
    if let Err(err) = result {
        eprintln!("td: logging disabled: {err}");
    }
}
