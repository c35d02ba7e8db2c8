use chrono::{DateTime, Utc};

/// Formats an RFC 3339 timestamp relative to `now` ("5 minutes ago", "2 days ago").
///
/// Unparseable and future timestamps are returned unchanged.
pub fn format_relative_time(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(parsed) = timestamp.parse::<DateTime<Utc>>() else {
        return timestamp.to_string();
    };

    let seconds = now.signed_duration_since(parsed).num_seconds();
    if seconds < 0 {
        return timestamp.to_string();
    }

    let (value, unit) = match seconds {
        0..=59 => return "just now".to_string(),
        60..=3599 => (seconds / 60, "minute"),
        3600..=86399 => (seconds / 3600, "hour"),
        86400..=604799 => (seconds / 86400, "day"),
        _ => (seconds / 604800, "week"),
    };
    format!("{value} {unit}{} ago", if value == 1 { "" } else { "s" })
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM (relative)` for field tables.
pub fn format_timestamp(timestamp: &str, now: DateTime<Utc>) -> String {
    if timestamp.is_empty() {
        return String::new();
    }
    match timestamp.parse::<DateTime<Utc>>() {
        Ok(parsed) => format!(
            "{} ({})",
            parsed.format("%Y-%m-%d %H:%M"),
            format_relative_time(timestamp, now)
        ),
        Err(_) => timestamp.to_string(),
    }
}
