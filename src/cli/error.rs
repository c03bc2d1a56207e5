// Error handling utilities for consistent error messages and exit codes

use std::process;
use chrono::NaiveDate;
use crate::utils::date::parse_iso_date;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing resources, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Print a non-fatal warning to stderr
pub fn warn_user(message: &str) {
    eprintln!("Warning: {}", message);
}

/// Validate a date argument (YYYY-MM-DD or ISO timestamp)
pub fn validate_date(value: &str, field_name: &str) -> Result<NaiveDate, String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }
    parse_iso_date(value)
        .ok_or_else(|| format!("Invalid {}: '{}'. Expected YYYY-MM-DD.", field_name, value))
}

/// Validate a pin window: end (if any) must not precede start
pub fn validate_pin_window(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), String> {
    match end {
        Some(end) if end < start => Err(format!(
            "Invalid pin window: end date {} is before start date {}.",
            end, start
        )),
        _ => Ok(()),
    }
}
