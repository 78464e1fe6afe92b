//! Compact duration rendering ("1h 1m 1s")

use chrono::Duration;

/// Format a whole number of seconds as `"<h>h <m>m <s>s"`.
///
/// Hours are omitted when zero. Minutes are shown when non-zero or when
/// hours are shown, so `3605` renders as `"1h 0m 5s"` rather than `"1h 5s"`.
/// Seconds are always shown. Negative input is clamped to zero.
pub fn format_duration(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 || hours > 0 {
        parts.push(format!("{}m", minutes));
    }
    parts.push(format!("{}s", seconds));

    parts.join(" ")
}

/// [`format_duration`] over a chrono duration, truncated to whole seconds.
pub fn format_delta(delta: Duration) -> String {
    format_duration(delta.num_seconds())
}
