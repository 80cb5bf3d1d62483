//! Date normalization for sheet cells.
//!
//! Date columns arrive in three shapes: an already typed date, a
//! `Date(year,month,day)` token with a zero-based month, or a free-form date
//! string. All three normalize to a local [`NaiveDateTime`].

use chrono::{DateTime, Datelike, Local, Months, NaiveDate, NaiveDateTime, TimeDelta};

use crate::types::CellValue;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%B %d, %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%A, %B %d, %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

/// Normalize a raw cell value into a date.
///
/// Returns `None` for numbers, booleans and text that is neither a
/// `Date(..)` token nor a recognizable date.
pub fn normalize(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::Date(date) => Some(*date),
        CellValue::Text(text) => normalize_str(text),
        CellValue::Number(_) | CellValue::Bool(_) => None,
    }
}

pub fn normalize_str(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.starts_with("Date(") {
        if let Some(date) = parse_date_token(text) {
            return Some(date);
        }
    }
    parse_generic(text)
}

/// Parse a `Date(y,m,d[,h,min,s])` token.
///
/// The month is zero-based. Out-of-range components roll over into the next
/// unit, so `Date(2024,12,1)` is 2025-01-01 and day 0 is the last day of the
/// previous month.
pub fn parse_date_token(text: &str) -> Option<NaiveDateTime> {
    let inner = text.trim().strip_prefix("Date(")?.strip_suffix(')')?;

    let parts = inner
        .split(',')
        .map(|p| p.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    if !(3..=6).contains(&parts.len()) {
        return None;
    }

    let year = i32::try_from(parts[0]).ok()?;
    let month = u32::try_from(parts[1]).ok()?;
    let day = parts[2];
    let time = |i: usize| parts.get(i).copied().unwrap_or(0);

    let first = NaiveDate::from_ymd_opt(year, 1, 1)?
        .checked_add_months(Months::new(month))?
        .and_hms_opt(0, 0, 0)?;

    let offset = TimeDelta::try_days(day.checked_sub(1)?)?
        .checked_add(&TimeDelta::try_hours(time(3))?)?
        .checked_add(&TimeDelta::try_minutes(time(4))?)?
        .checked_add(&TimeDelta::try_seconds(time(5))?)?;

    first.checked_add_signed(offset)
}

fn parse_generic(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Render a date as "March 15, 2024".
pub fn format(date: &NaiveDateTime) -> String {
    format!(
        "{} {}, {}",
        MONTH_NAMES[date.month0() as usize],
        date.day(),
        date.year()
    )
}
