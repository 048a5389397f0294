//! Display formatting for stored events.
//!
//! Renders a stored event as a one-line human-readable message, including
//! the ordinal-suffixed timestamp format used by the activity feed. Both
//! functions are pure; a timestamp that fails to parse falls through as
//! the raw string rather than erroring.

use chrono::{DateTime, Datelike, Utc};

use crate::models::{EventType, StoredEvent};

/// Renders an ISO-8601 timestamp as e.g. `1st April 2021 - 09:30 PM UTC`.
///
/// Accepts a trailing `Z` as the UTC offset and converts any other offset
/// to UTC before rendering. If the string does not parse, it is returned
/// unchanged.
pub fn render_timestamp(ts: &str) -> String {
    match DateTime::parse_from_rfc3339(ts) {
        Ok(parsed) => {
            let utc = parsed.with_timezone(&Utc);
            let day = utc.day();
            format!("{day}{} {}", ordinal_suffix(day), utc.format("%B %Y - %I:%M %p UTC"))
        },
        Err(_) => ts.to_string(),
    }
}

/// Ordinal suffix for a day of month.
///
/// "th" for 4-20 and 24-30, otherwise st/nd/rd by the last digit. Applied
/// literally this covers every day a calendar can produce.
fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        4..=20 | 24..=30 => "th",
        d => match d % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// Formats a stored event as a one-line display message.
///
/// A pull_request or merge record with no source branch cannot be
/// produced by the normalizer; if one appears anyway the branch renders
/// empty rather than failing the listing.
pub fn format_message(event: &StoredEvent) -> String {
    let ts = render_timestamp(&event.timestamp);
    let from_branch = event.from_branch.as_deref().unwrap_or_default();

    match event.event_type {
        EventType::Push => {
            format!("{} pushed to {} on {}", event.author, event.to_branch, ts)
        },
        EventType::PullRequest => {
            format!(
                "{} submitted a pull request from {} to {} on {}",
                event.author, from_branch, event.to_branch, ts
            )
        },
        EventType::Merge => {
            format!(
                "{} merged branch {} to {} on {}",
                event.author, from_branch, event.to_branch, ts
            )
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_suffixes_cover_the_calendar() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(20), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(24), "th");
        assert_eq!(ordinal_suffix(30), "th");
        assert_eq!(ordinal_suffix(31), "st");
    }

    #[test]
    fn renders_zulu_timestamp() {
        assert_eq!(render_timestamp("2021-04-01T21:30:00Z"), "1st April 2021 - 09:30 PM UTC");
    }

    #[test]
    fn renders_explicit_utc_offset() {
        assert_eq!(render_timestamp("2021-04-21T10:05:00+00:00"), "21st April 2021 - 10:05 AM UTC");
    }

    #[test]
    fn non_utc_offset_is_converted() {
        // 02:00 at +05:30 is 20:30 UTC the previous day.
        assert_eq!(render_timestamp("2021-04-02T02:00:00+05:30"), "1st April 2021 - 08:30 PM UTC");
    }

    #[test]
    fn unparseable_timestamp_falls_through() {
        assert_eq!(render_timestamp("not-a-date"), "not-a-date");
        assert_eq!(render_timestamp(""), "");
    }
}
