//! Parsing and rendering of markdown checkbox lines (`- [ ] text`, `- [x] text`).

use std::sync::OnceLock;

use regex::Regex;

pub const UNCHECKED_MARKER: &str = "- [ ]";
pub const CHECKED_MARKER: &str = "- [x]";

fn checkbox_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([\t ]*)- \[( |x)\] ?(.*)$").expect("regex"))
}

pub fn marker(checked: bool) -> &'static str {
    if checked {
        CHECKED_MARKER
    } else {
        UNCHECKED_MARKER
    }
}

/// Parses a single line into `(checked, text)`.
///
/// Leading spaces/tabs are tolerated, as is a missing space after the marker.
/// Returns `None` for anything that is not a checkbox line.
pub fn parse(line: &str) -> Option<(bool, String)> {
    let caps = checkbox_re().captures(line)?;
    let checked = caps.get(2).map(|m| m.as_str() == "x").unwrap_or(false);
    let text = caps.get(3).map(|m| m.as_str()).unwrap_or("").to_string();
    Some((checked, text))
}

/// True when the line is a checkbox carrying actual text.
///
/// Blank lines and bare markers are formatting, not tasks.
pub fn is_task_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed == UNCHECKED_MARKER || trimmed == CHECKED_MARKER {
        return false;
    }
    parse(line).is_some()
}

pub fn render(checked: bool, text: &str) -> String {
    format!("{} {}", marker(checked), text)
}

/// Rewrites the first marker found in `line` to the requested state.
///
/// Every other byte of the line is kept. Lines already in the requested state,
/// or without a marker at all, come back unchanged.
pub fn set_marker(line: &str, checked: bool) -> String {
    let (from, to) = if checked {
        (UNCHECKED_MARKER, CHECKED_MARKER)
    } else {
        (CHECKED_MARKER, UNCHECKED_MARKER)
    };
    line.replacen(from, to, 1)
}

/// The line with surrounding whitespace and one leading marker removed.
pub fn strip_marker(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed
        .strip_prefix(UNCHECKED_MARKER)
        .or_else(|| trimmed.strip_prefix(CHECKED_MARKER))
        .unwrap_or(trimmed)
        .trim()
}
