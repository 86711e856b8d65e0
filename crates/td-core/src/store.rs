//! Reading and mutating period files inside the vault.
//!
//! Task identity is the line text itself: status updates match the first line
//! containing the given text as a substring, so duplicate or prefix-sharing
//! tasks resolve to whichever comes first in the file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::checkbox;
use crate::config::TdConfig;
use crate::period::Period;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub text: String,
    pub checked: bool,
    pub raw_line: String,
}

impl Task {
    pub fn from_line(line: &str) -> Option<Task> {
        if !checkbox::is_task_line(line) {
            return None;
        }
        let (checked, text) = checkbox::parse(line)?;
        Some(Task {
            text,
            checked,
            raw_line: line.to_string(),
        })
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Task not found in the file: {0}")]
    NotFound(String),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    vault_root: PathBuf,
    period: Period,
    template_path: PathBuf,
}

impl TaskStore {
    pub fn new(vault_root: impl Into<PathBuf>, period: Period, template_path: impl Into<PathBuf>) -> Self {
        Self {
            vault_root: vault_root.into(),
            period,
            template_path: template_path.into(),
        }
    }

    pub fn from_config(config: &TdConfig) -> Self {
        Self::new(&config.vault_root, config.period(), &config.template_path)
    }

    pub fn vault_root(&self) -> &Path {
        &self.vault_root
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn template_file(&self) -> PathBuf {
        self.vault_root.join(&self.template_path)
    }

    pub fn file_path(&self, date: NaiveDate) -> PathBuf {
        self.period.file_path(&self.vault_root, date)
    }

    /// Creates the vault root if missing. Called once at startup.
    pub fn ensure_vault(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.vault_root).map_err(io_err(&self.vault_root))
    }

    fn template_content(&self) -> Result<Option<String>, StoreError> {
        let template = self.template_file();
        if !template.is_file() {
            return Ok(None);
        }
        fs::read_to_string(&template)
            .map(Some)
            .map_err(io_err(&template))
    }

    fn create_file(&self, path: &Path, header: Option<String>) -> Result<(), StoreError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err(dir))?;
        }
        let mut content = header.unwrap_or_default();
        if let Some(template) = self.template_content()? {
            content.push_str(&template);
        }
        terminate_line(&mut content);
        fs::write(path, content).map_err(io_err(path))?;
        debug!(path = %path.display(), "created period file");
        Ok(())
    }

    /// Returns the period file for `date`, seeding it from the template (no header) if absent.
    fn ensure_file(&self, date: NaiveDate) -> Result<PathBuf, StoreError> {
        let path = self.file_path(date);
        if !path.exists() {
            self.create_file(&path, None)?;
        }
        Ok(path)
    }

    /// Tasks in file order. Missing files fall back to the template's tasks.
    pub fn load_tasks(&self, date: NaiveDate) -> Result<Vec<Task>, StoreError> {
        let path = self.file_path(date);
        if path.exists() {
            return read_tasks(&path);
        }
        let template = self.template_file();
        if template.is_file() {
            return read_tasks(&template);
        }
        Ok(Vec::new())
    }

    pub fn add_task(&self, date: NaiveDate, text: &str) -> Result<PathBuf, StoreError> {
        let path = self.ensure_file(date)?;
        let existing = fs::read_to_string(&path).map_err(io_err(&path))?;
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(io_err(&path))?;
        if !existing.is_empty() && !existing.ends_with('\n') {
            writeln!(file).map_err(io_err(&path))?;
        }
        writeln!(file, "{}", checkbox::render(false, text)).map_err(io_err(&path))?;
        debug!(path = %path.display(), text, "added task");
        Ok(path)
    }

    /// Sets the marker of the first line containing `match_text`.
    ///
    /// The file is rewritten whole through a temp file and a rename.
    pub fn set_task_status(
        &self,
        date: NaiveDate,
        match_text: &str,
        checked: bool,
    ) -> Result<(), StoreError> {
        let path = self.ensure_file(date)?;
        let content = fs::read_to_string(&path).map_err(io_err(&path))?;
        let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
        let idx = lines
            .iter()
            .position(|line| line.contains(match_text))
            .ok_or_else(|| StoreError::NotFound(match_text.to_string()))?;
        lines[idx] = checkbox::set_marker(&lines[idx], checked);
        write_atomic(&path, &lines.join("\n"))?;
        debug!(path = %path.display(), line = idx + 1, checked, "updated task status");
        Ok(())
    }

    /// 1-indexed line holding `text`, ignoring markers and surrounding whitespace.
    ///
    /// Searches the template when the period file does not exist yet. Returns 0
    /// when nothing matches or there is nothing to search.
    pub fn locate_line(&self, date: NaiveDate, text: &str) -> Result<usize, StoreError> {
        let path = self.file_path(date);
        let target = if path.exists() {
            path
        } else {
            let template = self.template_file();
            if !template.is_file() {
                return Ok(0);
            }
            template
        };
        let content = fs::read_to_string(&target).map_err(io_err(&target))?;
        let needle = checkbox::strip_marker(text);
        Ok(content
            .lines()
            .position(|line| checkbox::strip_marker(line) == needle)
            .map(|idx| idx + 1)
            .unwrap_or(0))
    }

    pub fn contains_task(&self, date: NaiveDate, text: &str) -> Result<bool, StoreError> {
        Ok(self.locate_line(date, text)? > 0)
    }

    /// Appends every unchecked task of `source` to `target`. Returns how many were copied.
    pub fn copy_unchecked_from(
        &self,
        source: NaiveDate,
        target: NaiveDate,
    ) -> Result<usize, StoreError> {
        let mut copied = 0;
        for task in self.load_tasks(source)? {
            if task.checked {
                continue;
            }
            self.add_task(target, &task.text)?;
            copied += 1;
        }
        debug!(%source, %target, copied, "copied unchecked tasks");
        Ok(copied)
    }

    /// Carries unchecked tasks forward from the previous period.
    ///
    /// Only acts when `date` has no file yet and the previous period has one.
    pub fn seed_from_previous(&self, date: NaiveDate) -> Result<usize, StoreError> {
        if self.file_path(date).exists() {
            return Ok(0);
        }
        let previous = self.period.previous(date);
        if !self.file_path(previous).exists() {
            return Ok(0);
        }
        self.copy_unchecked_from(previous, date)
    }

    /// Path to hand to the editor. New files get the period header plus template content.
    pub fn prepare_for_edit(&self, date: NaiveDate) -> Result<PathBuf, StoreError> {
        let path = self.file_path(date);
        if !path.exists() {
            self.create_file(&path, Some(self.period.header(date)))?;
        }
        Ok(path)
    }
}

fn read_tasks(path: &Path) -> Result<Vec<Task>, StoreError> {
    let content = fs::read_to_string(path).map_err(io_err(path))?;
    Ok(content.lines().filter_map(Task::from_line).collect())
}

/// Appends a newline to non-empty content that lacks one.
fn terminate_line(content: &mut String) {
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<(), StoreError> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    fs::write(&tmp, content).map_err(io_err(&tmp))?;
    fs::rename(&tmp, path).map_err(io_err(path))
}
