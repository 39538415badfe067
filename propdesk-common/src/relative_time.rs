//! Relative time labels for notification lists
//!
//! Converts a record's `createdAt` string into the short label shown next to
//! each notification ("5m ago", "2h ago", ...).

use chrono::{DateTime, Utc};

/// Label used whenever a timestamp is missing, malformed, or in the future
pub const FALLBACK_LABEL: &str = "Recently";

/// Label selection thresholds (seconds)
const JUST_NOW_MAX: i64 = 60; //        < 1m  → "Just now"
const MINUTES_MAX: i64 = 3_600; //      < 1h  → "Xm ago"
const HOURS_MAX: i64 = 86_400; //       < 24h → "Xh ago"
const DAYS_MAX: i64 = 604_800; //       < 7d  → "Xd ago"
                                //       >= 7d → "Mon D, YYYY"

/// Parse a record timestamp.
///
/// Accepts RFC 3339 (`2025-03-01T10:00:00Z`, with or without fractional
/// seconds or offset) and the offset-less `2025-03-01T10:00:00` form some
/// backends emit, which is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a record timestamp relative to `now`.
///
/// Never fails: anything that cannot be interpreted falls back to
/// [`FALLBACK_LABEL`].
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use propdesk_common::relative_time::format_relative_time;
///
/// let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
///
/// assert_eq!(format_relative_time(Some("2025-03-10T11:59:30Z"), now), "Just now");
/// assert_eq!(format_relative_time(Some("2025-03-10T11:15:00Z"), now), "45m ago");
/// assert_eq!(format_relative_time(Some("2025-03-10T09:00:00Z"), now), "3h ago");
/// assert_eq!(format_relative_time(Some("2025-03-08T12:00:00Z"), now), "2d ago");
/// assert_eq!(format_relative_time(Some("2025-01-02T08:00:00Z"), now), "Jan 2, 2025");
/// assert_eq!(format_relative_time(Some("not a date"), now), "Recently");
/// assert_eq!(format_relative_time(None, now), "Recently");
/// ```
pub fn format_relative_time(created_at: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(created) = created_at.and_then(parse_timestamp) else {
        return FALLBACK_LABEL.to_string();
    };

    let elapsed = now.signed_duration_since(created).num_seconds();

    if elapsed < 0 {
        // Clock skew between backend and client
        FALLBACK_LABEL.to_string()
    } else if elapsed < JUST_NOW_MAX {
        "Just now".to_string()
    } else if elapsed < MINUTES_MAX {
        format!("{}m ago", elapsed / 60)
    } else if elapsed < HOURS_MAX {
        format!("{}h ago", elapsed / 3_600)
    } else if elapsed < DAYS_MAX {
        format!("{}d ago", elapsed / 86_400)
    } else {
        created.format("%b %-d, %Y").to_string()
    }
}

/// [`format_relative_time`] against the current wall clock
pub fn format_relative_time_now(created_at: Option<&str>) -> String {
    format_relative_time(created_at, Utc::now())
}
