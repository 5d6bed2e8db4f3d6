//! Timestamp normalisation and display formatting.
//!
//! Readers post either epoch seconds or epoch milliseconds. Values below
//! [`SECONDS_THRESHOLD`] are seconds. Formatting only affects presentation;
//! stored values are never rewritten.

use chrono::{DateTime, FixedOffset, Offset, Utc};

pub const SECONDS_THRESHOLD: i64 = 10_000_000_000;

/// Asia/Tokyo. No DST, so a fixed offset is exact.
const DISPLAY_OFFSET_SECS: i32 = 9 * 3600;

const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

pub fn to_millis(ts: i64) -> i64 {
    if ts < SECONDS_THRESHOLD {
        ts.saturating_mul(1000)
    } else {
        ts
    }
}

fn display_zone() -> FixedOffset {
    FixedOffset::east_opt(DISPLAY_OFFSET_SECS).unwrap_or(Utc.fix())
}

/// Convert a stored timestamp to a zoned datetime. Out-of-range values yield `None`.
pub fn to_display_datetime(ts: i64) -> Option<DateTime<FixedOffset>> {
    DateTime::<Utc>::from_timestamp_millis(to_millis(ts)).map(|dt| dt.with_timezone(&display_zone()))
}

/// Render for the log table. A zero timestamp renders the current time.
pub fn format_display(ts: i64) -> String {
    let dt = if ts == 0 {
        Some(Utc::now().with_timezone(&display_zone()))
    } else {
        to_display_datetime(ts)
    };
    match dt {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => "—".to_string(),
    }
}

/// Render for member cards: missing or zero timestamps show a dash.
pub fn format_optional(ts: Option<i64>) -> String {
    match ts {
        Some(t) if t != 0 => format_display(t),
        _ => "—".to_string(),
    }
}
