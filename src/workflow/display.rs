//! Formatting helpers for labels, hints and dashboard lines.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// Shown when a record carries no usable timestamp
pub const UNKNOWN_TIME: &str = "recently";

/// `May 1, 2025`
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y").to_string()
}

pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_optional_date(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(format_date)
        .unwrap_or_else(|| UNKNOWN_TIME.to_string())
}

/// Relative description of a past instant ("3 hours ago", "recently").
pub fn format_relative(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(timestamp) = timestamp else {
        return UNKNOWN_TIME.to_string();
    };

    let elapsed = now - timestamp;
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        // Clock skew can put store timestamps slightly in the future
        "just now".to_string()
    } else if minutes < 60 {
        format!("{} ago", pluralize(minutes, "minute"))
    } else if elapsed.num_hours() < 24 {
        format!("{} ago", pluralize(elapsed.num_hours(), "hour"))
    } else if elapsed.num_days() < 30 {
        format!("{} ago", pluralize(elapsed.num_days(), "day"))
    } else {
        format!("on {}", format_date(timestamp))
    }
}

/// Countdown phrase for a day count produced by `deadlines::days_until`
pub fn format_countdown(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        d if d > 1 => format!("in {} days", d),
        d => format!("{} ago", pluralize(-d, "day")),
    }
}

pub fn pluralize<N>(count: N, unit: &str) -> String
where
    N: fmt::Display + PartialEq + From<u8>,
{
    if count == N::from(1) {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_date() {
        let timestamp = Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(format_date(timestamp), "May 1, 2025");
        assert_eq!(
            format_calendar_date(NaiveDate::from_ymd_opt(2025, 12, 24).unwrap()),
            "Dec 24, 2025"
        );
        assert_eq!(format_optional_date(None), "recently");
    }

    #[test]
    fn test_format_relative_falls_back_to_recently() {
        assert_eq!(format_relative(None, now()), "recently");
    }

    #[test]
    fn test_format_relative_buckets() {
        let now = now();
        assert_eq!(format_relative(Some(now + Duration::minutes(5)), now), "just now");
        assert_eq!(format_relative(Some(now - Duration::seconds(20)), now), "just now");
        assert_eq!(format_relative(Some(now - Duration::minutes(1)), now), "1 minute ago");
        assert_eq!(format_relative(Some(now - Duration::minutes(45)), now), "45 minutes ago");
        assert_eq!(format_relative(Some(now - Duration::hours(3)), now), "3 hours ago");
        assert_eq!(format_relative(Some(now - Duration::days(2)), now), "2 days ago");
        assert_eq!(
            format_relative(Some(now - Duration::days(45)), now),
            "on Mar 26, 2025"
        );
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(0), "today");
        assert_eq!(format_countdown(1), "tomorrow");
        assert_eq!(format_countdown(4), "in 4 days");
        assert_eq!(format_countdown(-1), "1 day ago");
        assert_eq!(format_countdown(-6), "6 days ago");
    }

    #[test]
    fn test_pluralize_counts_of_any_width() {
        assert_eq!(pluralize(1usize, "feedback round"), "1 feedback round");
        assert_eq!(pluralize(usize::MAX, "feedback round"), format!("{} feedback rounds", usize::MAX));
        assert_eq!(pluralize(-1i64, "day"), "-1 days");
        assert_eq!(pluralize(0i64, "day"), "0 days");
    }
}
