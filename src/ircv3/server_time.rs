//! Server-time tag parsing for the IRCv3 `server-time` capability.

use chrono::{DateTime, Utc};

/// Parse an IRCv3 server-time value such as `2023-01-01T12:00:00.000Z`.
///
/// Returns `None` for anything that is not RFC 3339.
pub fn parse_server_time(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
