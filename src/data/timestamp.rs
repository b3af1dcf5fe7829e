//! Human-readable timestamps for the header and status messages.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Long localized format, e.g. `January 1, 2024 12:00 AM`.
pub const LONG_FORMAT: &str = "%B %-d, %Y %-I:%M %p";

/// Format a UTC instant in the local time zone.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    format_in(time, &Local)
}

/// Format a UTC instant in an arbitrary time zone.
pub fn format_in<Tz: TimeZone>(time: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.with_timezone(tz).format(LONG_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_in_utc() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_in(t, &Utc), "January 1, 2024 12:00 AM");

        let t = Utc.with_ymd_and_hms(2024, 11, 23, 15, 7, 0).unwrap();
        assert_eq!(format_in(t, &Utc), "November 23, 2024 3:07 PM");
    }

    #[test]
    fn test_format_in_offset() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
        assert_eq!(format_in(t, &pacific), "December 31, 2023 4:00 PM");
    }
}
