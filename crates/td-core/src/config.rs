use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::period::{IntervalMode, Period, PeriodError};

pub const DEFAULT_VAULT_DIR: &str = ".td";
pub const DEFAULT_TEMPLATE_PATH: &str = ".template";
pub const DEFAULT_FOCUS_MINUTES: u64 = 25;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Period(#[from] PeriodError),
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// On-disk shape of `~/.td.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub vault_root: Option<String>,
    pub interval_mode: Option<IntervalMode>,
    /// Relative to the vault root.
    pub template_path: Option<String>,
    pub skip_weekend: Option<bool>,
    pub copy_previous_on_open: Option<bool>,
    pub focus_minutes: Option<u64>,
}

/// Resolved process-wide settings. Built once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TdConfig {
    pub vault_root: PathBuf,
    pub interval_mode: IntervalMode,
    pub template_path: PathBuf,
    pub skip_weekend: bool,
    pub copy_previous_on_open: bool,
    pub focus_minutes: u64,
}

impl Default for TdConfig {
    fn default() -> Self {
        Self {
            vault_root: PathBuf::from(DEFAULT_VAULT_DIR),
            interval_mode: IntervalMode::default(),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            skip_weekend: false,
            copy_previous_on_open: false,
            focus_minutes: DEFAULT_FOCUS_MINUTES,
        }
    }
}

impl TdConfig {
    pub fn period(&self) -> Period {
        Period::new(self.interval_mode, self.skip_weekend)
    }

    pub fn template_file(&self) -> PathBuf {
        self.vault_root.join(&self.template_path)
    }

    /// Layers the config file and then environment variables over the defaults.
    pub fn resolve(
        file: Option<ConfigFile>,
        env: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut config = TdConfig::default();
        if let Some(file) = file {
            config.apply_file(file);
        }
        config.apply_env(env)?;
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(root) = file.vault_root.filter(|value| !value.trim().is_empty()) {
            self.vault_root = PathBuf::from(root.trim());
        }
        if let Some(mode) = file.interval_mode {
            self.interval_mode = mode;
        }
        if let Some(template) = file.template_path.filter(|value| !value.trim().is_empty()) {
            self.template_path = PathBuf::from(template.trim());
        }
        if let Some(value) = file.skip_weekend {
            self.skip_weekend = value;
        }
        if let Some(value) = file.copy_previous_on_open {
            self.copy_previous_on_open = value;
        }
        if let Some(value) = file.focus_minutes {
            self.focus_minutes = value;
        }
    }

    fn apply_env(&mut self, env: &HashMap<String, String>) -> Result<(), ConfigError> {
        if let Some(root) = env_value(env, "TD_VAULT_LOC") {
            self.vault_root = PathBuf::from(root);
        }
        if let Some(mode) = env_value(env, "TD_INTERVAL_MODE") {
            self.interval_mode = mode.parse()?;
        }
        if let Some(template) = env_value(env, "TD_TEMPLATE_PATH") {
            self.template_path = PathBuf::from(template);
        }
        if let Some(value) = env_value(env, "TD_SKIP_WEEKEND") {
            self.skip_weekend = parse_bool("TD_SKIP_WEEKEND", value)?;
        }
        if let Some(value) = env_value(env, "TD_COPY_PREVIOUS") {
            self.copy_previous_on_open = parse_bool("TD_COPY_PREVIOUS", value)?;
        }
        if let Some(value) = env_value(env, "TD_FOCUS_MINUTES") {
            self.focus_minutes = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TD_FOCUS_MINUTES",
                value: value.to_string(),
            })?;
        }
        Ok(())
    }
}

fn env_value<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

pub fn resolve_user_home_dir(env: &HashMap<String, String>) -> Option<PathBuf> {
    for key in ["HOME", "USERPROFILE"] {
        if let Some(home) = env_value(env, key) {
            return Some(PathBuf::from(home));
        }
    }
    None
}

/// `$TD_CONFIG` when set, else `~/.td.toml`.
pub fn config_path(env: &HashMap<String, String>) -> Option<PathBuf> {
    if let Some(path) = env_value(env, "TD_CONFIG") {
        return Some(PathBuf::from(path));
    }
    resolve_user_home_dir(env).map(|home| home.join(".td.toml"))
}

pub fn load_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    Ok(Some(toml::from_str::<ConfigFile>(&text)?))
}

/// Full startup resolution: config file located through `env`, then env overrides.
pub fn load_config(env: &HashMap<String, String>) -> Result<TdConfig, ConfigError> {
    let file = match config_path(env) {
        Some(path) => load_config_file(&path)?,
        None => None,
    };
    TdConfig::resolve(file, env)
}
