//! Field extraction from the composite release-info cell and from the
//! workbook filename.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Regex to find runs of decimal digits.
static DIGITS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Regex to split a workbook filename into a solution-name prefix and a
/// date-like suffix such as "1st July 2025".
static FILENAME_DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)(\d{1,2}(st|nd|rd|th)?\s+\w+\s+\d{4})").unwrap());

/// Fallback when the composite field has no version token.
pub const DEFAULT_VERSION: &str = "RELEASE";
/// Fallback when the composite field has no due-date token.
pub const DEFAULT_DUE_DATE: &str = "DUE DATE";
/// Fallback when the composite field has no summary token.
pub const DEFAULT_SUMMARY: &str = "PRODEL SUMMARY";
/// Fallback when the composite field contains no digits.
pub const DEFAULT_KEY: &str = "KEY";
/// Fallback when the workbook filename has no date-like suffix.
pub const DEFAULT_SOLUTION: &str = "SOLUTION";

/// Release-level metadata parsed out of the composite release-info cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseParts {
    /// Version string (first comma-separated token).
    pub version: String,
    /// Due date (second token).
    pub due_date: String,
    /// Release summary (second-to-last token).
    pub summary: String,
}

/// Split the composite release-info field on commas.
///
/// The first token is the version, the second the due date, and the
/// second-to-last the summary. Missing tokens fall back to placeholder
/// literals so the template still renders something visible.
pub fn parse_release_parts(info: &str) -> ReleaseParts {
    let parts: Vec<&str> = info.split(',').map(str::trim).collect();

    let version = parts
        .first()
        .map(|p| p.to_string())
        .unwrap_or_else(|| DEFAULT_VERSION.to_string());
    let due_date = if parts.len() > 1 {
        parts[1].to_string()
    } else {
        DEFAULT_DUE_DATE.to_string()
    };
    let summary = if parts.len() > 2 {
        parts[parts.len() - 2].to_string()
    } else {
        DEFAULT_SUMMARY.to_string()
    };

    ReleaseParts {
        version,
        due_date,
        summary,
    }
}

/// Extract the last run of decimal digits from the composite field,
/// used as the release key. A field with no digits yields `"KEY"`.
pub fn extract_last_numeric(text: &str) -> String {
    DIGITS_REGEX
        .find_iter(text)
        .last()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_KEY.to_string())
}

/// Parse the solution name from the workbook filename.
///
/// The filename is expected to carry an arbitrary prefix followed by a
/// date-like suffix ("1st July 2025"); the prefix is trimmed and
/// underscores become spaces. Without a date suffix the default literal
/// `"SOLUTION"` is returned.
pub fn solution_name_from_filename(filename: &str) -> String {
    match FILENAME_DATE_REGEX.captures(filename) {
        Some(caps) => caps[1].replace('_', " ").trim().to_string(),
        None => DEFAULT_SOLUTION.to_string(),
    }
}
