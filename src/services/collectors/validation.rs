//! Field-level validation shared by collectors.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::domain::models::academic::parse_date;
use crate::domain::models::{CollectedRecord, RecordCheck};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

static GITHUB_USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-]{1,39}$").expect("valid username pattern"));

static MATRIC_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2,4}/\d{4}/\d{3,4}$").expect("valid matric number pattern")
});

/// `local@domain.tld` with a two-letter-or-longer alphabetic TLD.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// 1-39 characters, alphanumeric or hyphen.
pub fn is_valid_github_username(username: &str) -> bool {
    GITHUB_USERNAME.is_match(username)
}

/// `DEPT/YYYY/NNN`: 2-4 uppercase letters, a 4-digit year, 3-4 digits.
pub fn is_valid_matric_number(matric: &str) -> bool {
    MATRIC_NUMBER.is_match(matric)
}

/// Require a non-empty string field.
pub fn require_text(record: &CollectedRecord, field: &str) -> RecordCheck {
    match record.get_str(field) {
        Some(value) if !value.trim().is_empty() => RecordCheck::Valid,
        _ => RecordCheck::invalid(format!("{field} is missing or empty")),
    }
}

/// Require an integer field inside `range`.
pub fn require_int_in(
    record: &CollectedRecord,
    field: &str,
    range: std::ops::RangeInclusive<i64>,
) -> RecordCheck {
    match record.get_i64(field) {
        Some(value) if range.contains(&value) => RecordCheck::Valid,
        Some(value) => RecordCheck::invalid(format!(
            "{field} {value} outside {}-{}",
            range.start(),
            range.end()
        )),
        None => RecordCheck::invalid(format!("{field} is missing")),
    }
}

/// Like [`require_int_in`], but a null or absent field is accepted.
pub fn optional_int_in(
    record: &CollectedRecord,
    field: &str,
    range: std::ops::RangeInclusive<i64>,
) -> RecordCheck {
    match record.get(field) {
        None | Some(serde_json::Value::Null) => RecordCheck::Valid,
        Some(_) => require_int_in(record, field, range),
    }
}

/// Require a `YYYY-MM-DD` date field and return it.
pub fn require_date(record: &CollectedRecord, field: &str) -> Result<NaiveDate, RecordCheck> {
    record
        .get_str(field)
        .and_then(parse_date)
        .ok_or_else(|| RecordCheck::invalid(format!("{field} is not a YYYY-MM-DD date")))
}

/// Require two date fields with `start <= end`.
pub fn require_date_order(record: &CollectedRecord, start: &str, end: &str) -> RecordCheck {
    let start_date = match require_date(record, start) {
        Ok(date) => date,
        Err(check) => return check,
    };
    let end_date = match require_date(record, end) {
        Ok(date) => date,
        Err(check) => return check,
    };
    if end_date < start_date {
        return RecordCheck::invalid(format!("{end} is before {start}"));
    }
    RecordCheck::Valid
}
