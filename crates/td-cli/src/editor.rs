use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, bail, Context, Result};

const EDITOR_VARS: [&str; 3] = ["TD_EDITOR", "VISUAL", "EDITOR"];

/// Editor program and leading arguments, e.g. `["code", "-w"]`.
pub fn editor_command(env: &HashMap<String, String>) -> Result<Vec<String>> {
    for key in EDITOR_VARS {
        let Some(raw) = env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) else {
            continue;
        };
        let parts = shell_words::split(raw).with_context(|| format!("parse ${key}"))?;
        if !parts.is_empty() {
            return Ok(parts);
        }
    }
    let fallback = ["vim", "vi", "nano"]
        .into_iter()
        .find(|name| which::which(name).is_ok())
        .unwrap_or("vim");
    Ok(vec![fallback.to_string()])
}

/// Runs the editor on `path` at `line` and blocks until it exits.
pub fn open(path: &Path, line: usize, env: &HashMap<String, String>) -> Result<()> {
    let mut parts = editor_command(env)?.into_iter();
    let program = parts.next().ok_or_else(|| anyhow!("empty editor command"))?;
    let status = Command::new(&program)
        .args(parts)
        .arg(format!("+{}", line.max(1)))
        .arg(path)
        .status()
        .with_context(|| format!("launch editor {program}"))?;
    if !status.success() {
        bail!("editor {program} exited with {status}");
    }
    Ok(())
}
