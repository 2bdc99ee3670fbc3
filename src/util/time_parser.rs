//! Flexible time parser for CLI arguments, plus the timestamp-range predicate
//! used by the parse loop.
//!
//! Supported bound formats:
//! - Log format: `2013-01-02 03:55:22.13456`
//! - ISO 8601: `2013-01-02T03:55:22`
//! - Unix timestamp: `1357098922`
//! - Relative: `-1h`, `-30m`, `-2d`
//! - Time only (current day, UTC): `07:00`

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Error type for time parsing failures.
#[derive(Debug, Clone)]
pub struct TimeParseError {
    pub input: String,
    pub message: String,
}

impl std::fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse time '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for TimeParseError {}

/// Parse a flexible time string into a naive UTC datetime.
///
/// # Supported formats
///
/// | Format | Example |
/// |--------|---------|
/// | Log format | `2013-01-02 03:55:22.13456` |
/// | ISO 8601 | `2013-01-02T03:55:22` |
/// | Unix timestamp | `1357098922` |
/// | Relative | `-1h`, `-30m`, `-2d`, `-1w` |
/// | Time only (today, UTC) | `07:00` |
pub fn parse_time(input: &str) -> Result<NaiveDateTime, TimeParseError> {
    let input = input.trim();

    // Try each format in order
    if let Some(ts) = parse_log_timestamp(input) {
        return Ok(ts);
    }

    if let Some(ts) = try_parse_unix_timestamp(input) {
        return Ok(ts);
    }

    if let Some(ts) = try_parse_relative(input) {
        return Ok(ts);
    }

    if let Some(ts) = try_parse_iso8601(input) {
        return Ok(ts);
    }

    if let Some(ts) = try_parse_time_only(input) {
        return Ok(ts);
    }

    Err(TimeParseError {
        input: input.to_string(),
        message: "Unrecognized format. Use: log format (2013-01-02 03:55:22.13456), \
                  ISO 8601 (2013-01-02T03:55:22), Unix timestamp (1357098922), \
                  relative (-1h, -30m, -2d), or time only (07:00)"
            .to_string(),
    })
}

/// Parses a timestamp in the log's own format, `YYYY-MM-DD HH:MM:SS` with an
/// optional fractional part. Returns `None` if the string does not match.
pub fn parse_log_timestamp(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f").ok()
}

/// Try to parse as Unix timestamp (plain integer, seconds since epoch).
fn try_parse_unix_timestamp(input: &str) -> Option<NaiveDateTime> {
    if input.chars().all(|c| c.is_ascii_digit()) && !input.is_empty() {
        let secs = input.parse::<i64>().ok()?;
        Utc.timestamp_opt(secs, 0).single().map(|dt| dt.naive_utc())
    } else {
        None
    }
}

/// Try to parse as relative time (-1h, -30m, -2d, -1w), relative to now.
fn try_parse_relative(input: &str) -> Option<NaiveDateTime> {
    let rest = input.strip_prefix('-')?;
    if rest.is_empty() {
        return None;
    }

    let unit = rest.chars().last()?;
    let number_str = &rest[..rest.len() - 1];
    if number_str.is_empty() {
        return None;
    }
    let number: i64 = number_str.parse().ok()?;

    let seconds = match unit {
        's' => number,
        'm' => number * 60,
        'h' => number * 3600,
        'd' => number * 86400,
        'w' => number * 604800,
        _ => return None,
    };

    Some((Utc::now() - chrono::Duration::seconds(seconds)).naive_utc())
}

/// Try to parse as ISO 8601 datetime with `T` separator.
fn try_parse_iso8601(input: &str) -> Option<NaiveDateTime> {
    if !input.contains('T') {
        return None;
    }

    // With timezone first, then naive (assume UTC)
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt);
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M") {
        return Some(ndt);
    }

    None
}

/// Try to parse as time only (07:00 = today at that time, UTC).
fn try_parse_time_only(input: &str) -> Option<NaiveDateTime> {
    if input.len() != 5 || input.chars().nth(2) != Some(':') {
        return None;
    }

    let time = NaiveTime::parse_from_str(input, "%H:%M").ok()?;
    Some(NaiveDateTime::new(Utc::now().date_naive(), time))
}

/// Inclusive timestamp window applied to every data line.
///
/// Both bounds are optional; an unbounded range accepts everything. A
/// timestamp that does not parse is treated as out of range and the line is
/// dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TimeRange {
    /// Range accepting every timestamp.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Range with the given inclusive bounds.
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// Returns `true` if the timestamp string falls outside the window or
    /// cannot be parsed.
    pub fn is_out_of_range(&self, ts: &str) -> bool {
        let Some(ts) = parse_log_timestamp(ts) else {
            return true;
        };

        if let Some(start) = self.start
            && ts < start
        {
            return true;
        }
        if let Some(end) = self.end
            && ts > end
        {
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_log_format() {
        let ts = parse_time("2013-01-02 03:55:22.13456").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2013, 1, 2).unwrap());
        assert_eq!(ts.format("%H:%M:%S").to_string(), "03:55:22");

        // Without fractional part
        assert_eq!(
            parse_time("2013-01-02 03:55:22").unwrap(),
            naive(2013, 1, 2, 3, 55, 22)
        );
    }

    #[test]
    fn test_unix_timestamp() {
        assert_eq!(parse_time("0").unwrap(), naive(1970, 1, 1, 0, 0, 0));
        assert_eq!(
            parse_time("1357098922").unwrap(),
            Utc.timestamp_opt(1357098922, 0).unwrap().naive_utc()
        );
    }

    #[test]
    fn test_relative_time() {
        let now = Utc::now().naive_utc();

        let ts = parse_time("-1h").unwrap();
        assert!((now - ts).num_seconds().abs_diff(3600) < 2);

        let ts = parse_time("-30m").unwrap();
        assert!((now - ts).num_seconds().abs_diff(1800) < 2);

        let ts = parse_time("-2d").unwrap();
        assert!((now - ts).num_seconds().abs_diff(172800) < 2);
    }

    #[test]
    fn test_iso8601() {
        assert_eq!(
            parse_time("2013-01-02T03:55:22").unwrap(),
            naive(2013, 1, 2, 3, 55, 22)
        );
        assert_eq!(
            parse_time("2013-01-02T03:55").unwrap(),
            naive(2013, 1, 2, 3, 55, 0)
        );
    }

    #[test]
    fn test_time_only() {
        let ts = parse_time("07:00").unwrap();
        assert_eq!(ts.date(), Utc::now().date_naive());
        assert_eq!(ts.format("%H:%M:%S").to_string(), "07:00:00");
    }

    #[test]
    fn test_invalid_formats() {
        assert!(parse_time("").is_err());
        assert!(parse_time("invalid").is_err());
        assert!(parse_time("2013-01-02").is_err()); // date only, no time
        assert!(parse_time("-abc").is_err());
    }

    #[test]
    fn test_unbounded_range_accepts_everything() {
        let range = TimeRange::unbounded();
        assert!(!range.is_out_of_range("2013-01-02 03:55:22.13456"));
        assert!(!range.is_out_of_range("1970-01-01 00:00:00"));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = TimeRange::new(
            Some(naive(2013, 1, 2, 3, 0, 0)),
            Some(naive(2013, 1, 2, 4, 0, 0)),
        );

        assert!(range.is_out_of_range("2013-01-02 02:59:59"));
        assert!(!range.is_out_of_range("2013-01-02 03:00:00"));
        assert!(!range.is_out_of_range("2013-01-02 03:55:22.13456"));
        assert!(!range.is_out_of_range("2013-01-02 04:00:00"));
        assert!(range.is_out_of_range("2013-01-02 04:00:00.00001"));
    }

    #[test]
    fn test_unparseable_timestamp_is_out_of_range() {
        let range = TimeRange::unbounded();
        assert!(range.is_out_of_range("not a timestamp"));
        assert!(range.is_out_of_range(""));
    }
}
