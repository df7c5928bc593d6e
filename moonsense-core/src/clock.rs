//! Clock-string helpers.
//!
//! Astronomical timestamps flow through the pipeline as wall-clock epochs:
//! the day's `date_epoch` plus the seconds-since-midnight parsed out of the
//! upstream's `"07:59 AM"`-style strings. Formatting therefore happens in
//! UTC, which reproduces the local wall time the upstream reported.

use chrono::DateTime;

/// Format a wall-clock epoch as a 12-hour `"7:59 AM"` string.
pub fn format_unix_time(secs: i64) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%-I:%M %p").to_string(),
        None => "--".to_string(),
    }
}

/// Parse a `"7:59 AM"` / `"07:59 PM"` clock string into seconds since
/// midnight. Handles `12 AM == 00:00` and `12 PM == 12:00`.
pub fn parse_clock_time(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    let (clock, meridiem) = trimmed.split_once(char::is_whitespace)?;
    let (hh, mm) = clock.split_once(':')?;

    let mut hour: u32 = hh.trim().parse().ok()?;
    let minute: u32 = mm.trim().parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }

    match meridiem.trim().to_ascii_uppercase().as_str() {
        "AM" => {
            if hour == 12 {
                hour = 0;
            }
        }
        "PM" => {
            if hour != 12 {
                hour += 12;
            }
        }
        _ => return None,
    }

    Some(hour * 3600 + minute * 60)
}

/// Anchor an upstream clock string to its forecast day. Unparseable
/// strings (the upstream emits `"No moonrise"` near the poles) resolve to
/// the start of the day rather than an error.
pub fn epoch_from_clock(date_epoch: i64, text: &str) -> i64 {
    date_epoch + i64::from(parse_clock_time(text).unwrap_or(0))
}

/// Short weekday and date labels for a daily row, e.g. `("Thu", "Dec 12")`.
pub fn day_labels(date_epoch: i64) -> (String, String) {
    match DateTime::from_timestamp(date_epoch, 0) {
        Some(dt) => (dt.format("%a").to_string(), dt.format("%b %-d").to_string()),
        None => ("--".to_string(), "--".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_twelve_hour_clock() {
        // 1970-01-01 00:00, 07:59, 12:00, 23:05.
        assert_eq!(format_unix_time(0), "12:00 AM");
        assert_eq!(format_unix_time(7 * 3600 + 59 * 60), "7:59 AM");
        assert_eq!(format_unix_time(12 * 3600), "12:00 PM");
        assert_eq!(format_unix_time(23 * 3600 + 5 * 60), "11:05 PM");
    }

    #[test]
    fn parses_meridiem_edge_cases() {
        assert_eq!(parse_clock_time("12:00 AM"), Some(0));
        assert_eq!(parse_clock_time("12:00 PM"), Some(12 * 3600));
        assert_eq!(parse_clock_time("07:59 AM"), Some(7 * 3600 + 59 * 60));
        assert_eq!(parse_clock_time("7:59 pm"), Some(19 * 3600 + 59 * 60));
        assert_eq!(parse_clock_time("No moonrise"), None);
        assert_eq!(parse_clock_time("25:00 AM"), None);
    }

    #[test]
    fn format_parse_round_trip() {
        // Any time of day must survive format → parse within the same day.
        for secs in (0i64..86_400).step_by(61) {
            let formatted = format_unix_time(secs);
            let parsed = parse_clock_time(&formatted)
                .unwrap_or_else(|| panic!("unparseable: {formatted}"));
            let minute_of_day = (secs as u32 / 60) * 60;
            assert_eq!(parsed, minute_of_day, "round-trip drift at {secs} ({formatted})");
        }
    }

    #[test]
    fn anchors_clock_strings_to_day() {
        let day = 1_702_339_200; // 2023-12-12 00:00 UTC
        assert_eq!(epoch_from_clock(day, "06:05 AM"), day + 6 * 3600 + 5 * 60);
        assert_eq!(epoch_from_clock(day, "No moonset"), day);
    }

    #[test]
    fn day_labels_match_calendar() {
        let (weekday, date) = day_labels(1_702_339_200);
        assert_eq!(weekday, "Tue");
        assert_eq!(date, "Dec 12");
    }
}
