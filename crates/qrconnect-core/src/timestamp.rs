//! Record timestamps: epoch milliseconds stored as text.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};

/// Display format for history listings, e.g. `Nov 14, 2023 22:13`.
pub const DISPLAY_FORMAT: &str = "%b %d, %Y %H:%M";

/// Current time as epoch milliseconds.
pub fn now_millis() -> String { Utc::now().timestamp_millis().to_string() }

/// Render a stored timestamp in local time. Values that are not epoch
/// milliseconds are returned unchanged.
pub fn format_display(created_at: &str) -> String {
  format_display_in(created_at, &Local)
}

pub fn format_display_in<Tz>(created_at: &str, tz: &Tz) -> String
where
  Tz: TimeZone,
  Tz::Offset: Display,
{
  created_at
    .trim()
    .parse::<i64>()
    .ok()
    .and_then(DateTime::<Utc>::from_timestamp_millis)
    .map(|dt| dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string())
    .unwrap_or_else(|| created_at.to_owned())
}
