use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalMode {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Unknown interval mode '{0}' (expected daily, weekly or monthly)")]
    UnknownMode(String),
    #[error("Invalid date '{0}' (expected today, tomorrow, yesterday or YYYY-MM-DD)")]
    InvalidDate(String),
}

impl IntervalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalMode::Daily => "daily",
            IntervalMode::Weekly => "weekly",
            IntervalMode::Monthly => "monthly",
        }
    }
}

impl fmt::Display for IntervalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalMode {
    type Err = PeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "daily" => Ok(IntervalMode::Daily),
            "weekly" => Ok(IntervalMode::Weekly),
            "monthly" => Ok(IntervalMode::Monthly),
            _ => Err(PeriodError::UnknownMode(value.to_string())),
        }
    }
}

/// Bucketing granularity for period files.
///
/// Built once from configuration; `skip_weekend` only affects daily navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Period {
    pub mode: IntervalMode,
    pub skip_weekend: bool,
}

impl Period {
    pub fn new(mode: IntervalMode, skip_weekend: bool) -> Self {
        Self { mode, skip_weekend }
    }

    pub fn file_path(&self, vault_root: &Path, date: NaiveDate) -> PathBuf {
        file_path(vault_root, self.mode, date)
    }

    pub fn header(&self, date: NaiveDate) -> String {
        header(self.mode, date)
    }

    pub fn next(&self, date: NaiveDate) -> NaiveDate {
        next(self.mode, date, self.skip_weekend)
    }

    pub fn previous(&self, date: NaiveDate) -> NaiveDate {
        previous(self.mode, date, self.skip_weekend)
    }
}

fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

pub fn file_path(vault_root: &Path, mode: IntervalMode, date: NaiveDate) -> PathBuf {
    let month = month_name(date);
    match mode {
        IntervalMode::Daily => vault_root
            .join(date.year().to_string())
            .join(&month)
            .join(date.day().to_string()),
        IntervalMode::Weekly => {
            let week = date.iso_week();
            vault_root
                .join(week.year().to_string())
                .join(&month)
                .join(format!("week{}", week.week()))
        }
        IntervalMode::Monthly => vault_root
            .join(date.year().to_string())
            .join(&month)
            .join(&month),
    }
}

pub fn header(mode: IntervalMode, date: NaiveDate) -> String {
    match mode {
        IntervalMode::Daily => format!("{}\n\n", date.format("%Y-%m-%d %A")),
        IntervalMode::Weekly => format!("Week {}\n\n", date.iso_week().week()),
        IntervalMode::Monthly => format!("{} {}\n\n", month_name(date), date.year()),
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn step_day(date: NaiveDate, forward: bool, skip_weekend: bool) -> NaiveDate {
    let delta = if forward {
        Duration::days(1)
    } else {
        Duration::days(-1)
    };
    let mut next = date + delta;
    while skip_weekend && is_weekend(next) {
        next = next + delta;
    }
    next
}

pub fn next(mode: IntervalMode, date: NaiveDate, skip_weekend: bool) -> NaiveDate {
    match mode {
        IntervalMode::Daily => step_day(date, true, skip_weekend),
        IntervalMode::Weekly => date + Duration::days(7),
        IntervalMode::Monthly => date.checked_add_months(Months::new(1)).unwrap_or(date),
    }
}

pub fn previous(mode: IntervalMode, date: NaiveDate, skip_weekend: bool) -> NaiveDate {
    match mode {
        IntervalMode::Daily => step_day(date, false, skip_weekend),
        IntervalMode::Weekly => date - Duration::days(7),
        IntervalMode::Monthly => date.checked_sub_months(Months::new(1)).unwrap_or(date),
    }
}

/// Parses `today`, `tomorrow`, `yesterday` or an ISO `YYYY-MM-DD` date.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, PeriodError> {
    match input.trim().to_lowercase().as_str() {
        "" | "today" => Ok(today),
        "tomorrow" => Ok(today + Duration::days(1)),
        "yesterday" => Ok(today - Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|_| PeriodError::InvalidDate(input.to_string())),
    }
}
