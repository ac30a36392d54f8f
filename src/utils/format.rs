//! Formatting utilities for timestamps, byte sizes and other display values.
//!
//! Timestamps are milliseconds since the Unix epoch, as returned by
//! `Date.now()`, and are always rendered in UTC.

/// Format as `YYYY-MM-DD HH:MM:SS UTC` (used by `date` and log export).
pub fn format_timestamp(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{} {} UTC", format_date_iso(secs), clock(secs))
}

/// Format as `HH:MM:SS` for log lines.
pub fn format_time(ms: u64) -> String {
    clock(ms / 1000)
}

fn clock(secs: u64) -> String {
    let hour = (secs % 86400) / 3600;
    let min = (secs % 3600) / 60;
    let sec = secs % 60;
    format!("{:02}:{:02}:{:02}", hour, min, sec)
}

/// Format Unix seconds as ISO date (YYYY-MM-DD).
///
/// Properly calculates year/month/day accounting for leap years.
pub fn format_date_iso(secs: u64) -> String {
    let mut remaining_days = (secs / 86400) as i64;
    let mut year = 1970i64;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let days_in_months: [i64; 12] = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1;
    for days_in_month in days_in_months {
        if remaining_days < days_in_month {
            break;
        }
        remaining_days -= days_in_month;
        month += 1;
    }

    format!("{:04}-{:02}-{:02}", year, month, remaining_days + 1)
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Human-readable byte count with up to two decimals (`1.5 KB`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_iso() {
        assert_eq!(format_date_iso(0), "1970-01-01");
        // 2024-01-01 00:00:00 UTC
        assert_eq!(format_date_iso(1704067200), "2024-01-01");
        // leap day
        assert_eq!(format_date_iso(1709164800), "2024-02-29");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(1000), "1970-01-01 00:00:01 UTC");
        assert_eq!(format_timestamp(1704067200000 + 3_723_000), "2024-01-01 01:02:03 UTC");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(512), "512 Bytes");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024), "1 MB");
        assert_eq!(format_size(1234), "1.21 KB");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(45_296_999), "12:34:56");
    }
}
