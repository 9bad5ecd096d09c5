//! Display projection of the store's history listing.

use chrono::{Local, NaiveDateTime, TimeZone};

use crate::scenario::model::HistoryEntry;

/// Timestamp format used by the store and for display.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A history row ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    /// Store key, used to reload the scenario.
    pub name: String,
    /// Creation time in local time, or the raw stored value if it could not be parsed.
    pub created: String,
    /// `"<name> - Created: <created>"`
    pub label: String,
}

/// Projects the listing into local time.
pub fn project(entries: &[HistoryEntry]) -> Vec<HistoryItem> {
    project_in(entries, &Local)
}

/// Projects the listing into the given timezone, keeping the store's order.
pub fn project_in<Tz>(entries: &[HistoryEntry], tz: &Tz) -> Vec<HistoryItem>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    entries
        .iter()
        .map(|entry| {
            let created = format_timestamp(&entry.created_at, tz);
            HistoryItem {
                label: format!("{} - Created: {}", entry.name, created),
                name: entry.name.clone(),
                created,
            }
        })
        .collect()
}

fn format_timestamp<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        Ok(naive) => naive
            .and_utc()
            .with_timezone(tz)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
        Err(e) => {
            tracing::debug!(timestamp = raw, error = %e, "Unparseable history timestamp");
            raw.to_string()
        }
    }
}
