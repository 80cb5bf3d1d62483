use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A display-ready event built from one sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Human-readable date, e.g. "March 15, 2024".
    pub display_date: String,
    /// Ordering key only; never displayed.
    pub sort_key: NaiveDateTime,
    pub title: String,
    /// Free text, possibly markdown.
    pub description: String,
    pub image: String,
    pub alt: String,
    #[serde(default)]
    pub published: bool,
}

/// Order records most recent first. Equal keys keep their relative order.
pub fn sort_most_recent_first(records: &mut [EventRecord]) {
    records.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
}
