//! Built-in events for offline previews.

use chrono::{NaiveDate, NaiveDateTime};

use crate::date;
use crate::error::FeedError;
use crate::event::{sort_most_recent_first, EventRecord};
use crate::source::EventSource;

/// An in-memory event source.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    events: Vec<EventRecord>,
}

impl StaticSource {
    pub fn new(mut events: Vec<EventRecord>) -> Self {
        sort_most_recent_first(&mut events);
        Self { events }
    }

    /// The four sample community events.
    pub fn sample() -> Self {
        Self::new(sample_events())
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }
}

impl EventSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<EventRecord>, FeedError> {
        Ok(self.events.clone())
    }
}

fn sample(y: i32, m: u32, d: u32, title: &str, description: &str, image: &str) -> Option<EventRecord> {
    let sort_key: NaiveDateTime = NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(0, 0, 0)?;
    Some(EventRecord {
        display_date: date::format(&sort_key),
        sort_key,
        title: title.to_string(),
        description: description.to_string(),
        image: image.to_string(),
        alt: title.to_string(),
        published: true,
    })
}

/// Sample events, most recent first.
pub fn sample_events() -> Vec<EventRecord> {
    let events = [
        sample(
            2024,
            3,
            15,
            "Spring Community Garden Opening",
            "We're excited to announce the opening of our community garden for the spring season! \
             Join us this Saturday at 10 AM for the grand opening ceremony. \
             Volunteers needed for planting and maintenance.",
            "images/community-garden.jpg",
        ),
        sample(
            2024,
            3,
            10,
            "Community Meeting Announcement",
            "Our next monthly community meeting will be held on March 25th at 7 PM in the community center. \
             Agenda items include budget review, upcoming events, and neighborhood improvements. \
             All residents are welcome!",
            "images/community-meeting.jpg",
        ),
        sample(
            2024,
            3,
            5,
            "Neighborhood Cleanup Day",
            "Join us for our annual spring neighborhood cleanup day on March 30th from 9 AM to 12 PM. \
             We'll provide trash bags, gloves, and refreshments. \
             Let's work together to keep our community beautiful!",
            "images/cleanup-day.jpg",
        ),
        sample(
            2024,
            2,
            28,
            "New Playground Equipment Installed",
            "We're thrilled to announce that new playground equipment has been installed at the community park! \
             The new structure includes swings, climbing equipment, and a slide. Come check it out!",
            "images/playground.jpg",
        ),
    ];

    let mut events: Vec<EventRecord> = events.into_iter().flatten().collect();
    sort_most_recent_first(&mut events);
    events
}
