use chrono::{DateTime, Duration, Utc};

/// Parse a decimal count of seconds since the Unix epoch.
///
/// Returns `None` if the value is not an integer or falls outside the range `chrono` can represent.
pub(crate) fn parse_epoch_seconds(s: &str) -> Option<DateTime<Utc>> {
    let seconds = s.parse::<i64>().ok()?;
    DateTime::<Utc>::from_timestamp(seconds, 0)
}

/// Format a duration as minutes if it is an exact number of minutes, otherwise as seconds.
pub(crate) fn duration_to_string(duration: Duration) -> String {
    let secs = duration.num_seconds();
    if secs % 60 == 0 {
        format!("{} min", duration.num_minutes())
    } else {
        format!("{} sec", secs)
    }
}
