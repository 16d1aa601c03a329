use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::error::{LogsiftError, Result};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a query bound. Values without an offset are taken as UTC; a bare
/// duration such as `15m` means that long before now.
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>> {
    let input = input.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc().fixed_offset());
    }

    if let Ok(duration) = humantime::parse_duration(input) {
        let duration = chrono::Duration::from_std(duration).map_err(|e| {
            LogsiftError::Parse(format!("failed to parse duration to chrono: {e}"))
        })?;
        return Utc::now()
            .checked_sub_signed(duration)
            .map(|ts| ts.fixed_offset())
            .ok_or_else(|| LogsiftError::Parse(format!("duration {input} is out of range")));
    }

    Err(LogsiftError::Parse(format!(
        "expected RFC3339 time, date or duration, got {input}"
    )))
}
