use chrono::{Datelike, TimeZone, Utc};

use crate::network::PlayerRecord;

/// Format a Unix timestamp as `M/D/YYYY` in UTC, f.e. `1/1/2021`.
pub fn format_date(timestamp: i64) -> String {
    match Utc.timestamp_opt(timestamp, 0).single() {
        Some(date) => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        None => "Unknown".to_string(),
    }
}

/// The personal name if there is one, or the username otherwise.
pub fn display_name(player: &PlayerRecord) -> &str {
    if player.name.trim().is_empty() {
        &player.username
    } else {
        &player.name
    }
}

/// Link target of a list entry.
pub fn profile_href(id: &str) -> String {
    format!("/player/{}", id)
}
