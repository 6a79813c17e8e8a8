use crate::error::{ProcessingError, Result};
use chrono::NaiveDate;

const DATE_FORMATS: [&str; 3] = ["%Y/%m/%d", "%Y-%m-%d", "%Y%m%d"];

/// Parse `YYYY/M/D`, `YYYY-MM-DD` or `YYYYMMDD`
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid date: '{}'", raw)))
}

/// Hour from an `H:MM` time cell; `24:00` stays 24 as published
pub fn parse_hour(raw: &str) -> Option<u32> {
    raw.trim()
        .split(':')
        .next()
        .and_then(|h| h.trim().parse::<u32>().ok())
        .filter(|h| *h <= 24)
}
