//! Date and name formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a backend timestamp. Accepts RFC 3339, zone-less date-times (taken
/// as UTC) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// "Jan 15, 2024". Unparseable input is returned as is.
pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// "Jan 15, 2024, 10:30 AM". Unparseable input is returned as is.
pub fn format_date_time(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.format("%b %-d, %Y, %-I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

/// "2 hours ago", relative to now.
pub fn format_relative_time(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => relative_time(ts, Utc::now()),
        None => raw.to_string(),
    }
}

/// "2 hours ago" for the past, "in 2 hours" for the future.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let span = distance(seconds.unsigned_abs());
    if seconds < 0 {
        format!("in {}", span)
    } else {
        format!("{} ago", span)
    }
}

fn distance(seconds: u64) -> String {
    if seconds < 60 {
        return plural(seconds, "second");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    let days = hours / 24;
    if days < 30 {
        return plural(days, "day");
    }
    let months = days / 30;
    if months < 12 {
        return plural(months, "month");
    }
    plural(months / 12, "year")
}

fn plural(n: u64, unit: &str) -> String {
    format!("{} {}{}", n, unit, if n == 1 { "" } else { "s" })
}

/// Initials from first and last name, e.g. "JD".
pub fn initials(first_name: &str, last_name: &str) -> String {
    first_name
        .chars()
        .take(1)
        .chain(last_name.chars().take(1))
        .flat_map(char::to_uppercase)
        .collect()
}

/// Initials of up to two words of a full name.
pub fn initials_of(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}
