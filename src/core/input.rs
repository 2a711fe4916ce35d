//! Pure validation for interactive input.
//!
//! These functions never prompt or retry; they classify one line of text.
//! The console shim owns the re-prompt loop.

use crate::core::error::WorksError;
use chrono::NaiveDate;

/// Date-only input, `YYYY-MM-DD`.
pub fn parse_date_input(raw: &str) -> Result<NaiveDate, WorksError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        WorksError::ValidationError("expected a date in YYYY-MM-DD format".to_string())
    })
}

pub fn parse_int_input(raw: &str) -> Result<i64, WorksError> {
    raw.trim()
        .parse()
        .map_err(|_| WorksError::ValidationError("expected a whole number".to_string()))
}

pub fn parse_float_input(raw: &str) -> Result<f64, WorksError> {
    raw.trim().parse().map_err(|_| {
        WorksError::ValidationError("expected a number (use '.' for decimals)".to_string())
    })
}

/// Labor headcount: a whole number, never negative.
pub fn parse_headcount_input(raw: &str) -> Result<i64, WorksError> {
    let value = parse_int_input(raw)?;
    if value < 0 {
        return Err(WorksError::ValidationError(
            "headcount cannot be negative".to_string(),
        ));
    }
    Ok(value)
}

/// Progress percentage, 0 to 100.
pub fn parse_progress_input(raw: &str) -> Result<f64, WorksError> {
    let value = parse_float_input(raw)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(WorksError::ValidationError(
            "progress must be between 0 and 100".to_string(),
        ));
    }
    Ok(value)
}

/// Case-insensitive "si"/"sí"/"no".
pub fn parse_yes_no(raw: &str) -> Result<bool, WorksError> {
    match raw.trim().to_lowercase().as_str() {
        "si" | "sí" => Ok(true),
        "no" => Ok(false),
        _ => Err(WorksError::ValidationError(
            "answer 'SI' or 'NO'".to_string(),
        )),
    }
}

/// Canonical rendering of a yes/no answer.
pub fn canonical_yes_no(value: bool) -> &'static str {
    if value { "SI" } else { "NO" }
}
