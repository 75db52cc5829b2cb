//! Duration and elapsed-time formatting.

use chrono::{DateTime, Utc};

/// Formats whole minutes as `"Xh Ym"`.
///
/// Negative durations are treated as 0.
pub fn format_duration(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Formats time elapsed since `since` as `"Xh Ym ago"`, or `"Ym ago"` under an hour.
///
/// Partial minutes are floored; a `since` in the future reads as `"0m ago"`.
pub fn format_elapsed(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - since).num_minutes().max(0);
    let hours = minutes / 60;
    if hours > 0 {
        format!("{hours}h {}m ago", minutes % 60)
    } else {
        format!("{minutes}m ago")
    }
}
