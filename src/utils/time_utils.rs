use chrono::NaiveDateTime;
use std::time::Duration;

/// Frame-loop clock. `web_time` so the same type works on every eframe backend.
pub type AppInstant = web_time::Instant;

pub const BAR_TIME_FORMAT: &str = "%m-%d %H:%M";

/// Axis/tooltip label for a feed bar timestamp.
pub fn format_bar_time(ts: NaiveDateTime) -> String {
    ts.format(BAR_TIME_FORMAT).to_string()
}

/// Coarse "how long ago" for the status bar (e.g. `12s ago`, `3m ago`).
pub fn format_ago(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        return format!("{}s ago", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m ago", mins);
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    format!("{}d ago", hours / 24)
}
