use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "unknown";

/// One completed focus session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FocusSession {
    pub start: DateTime<Local>,
    /// Whole minutes.
    pub duration: u64,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

pub fn sessions_path(vault_root: &Path) -> PathBuf {
    vault_root.join(".sessions.json")
}

pub fn load_sessions(vault_root: &Path) -> Result<Vec<FocusSession>> {
    let path = sessions_path(vault_root);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

pub fn save_sessions(vault_root: &Path, sessions: &[FocusSession]) -> Result<PathBuf> {
    let path = sessions_path(vault_root);
    let tmp = path.with_extension("json.tmp");
    let raw = serde_json::to_string_pretty(sessions).context("serialize sessions")?;
    fs::write(&tmp, raw).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, &path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(path)
}

pub fn record_session(vault_root: &Path, session: FocusSession) -> Result<PathBuf> {
    let mut sessions = load_sessions(vault_root)?;
    sessions.push(session);
    save_sessions(vault_root, &sessions)
}

pub fn total_minutes(sessions: &[FocusSession], category: Option<&str>) -> u64 {
    sessions
        .iter()
        .filter(|s| category.map(|c| s.category == c).unwrap_or(true))
        .map(|s| s.duration)
        .sum()
}
