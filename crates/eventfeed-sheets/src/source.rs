//! Where event records come from.

use crate::error::FeedError;
use crate::event::EventRecord;

/// A source of event records, already sorted most recent first.
#[allow(async_fn_in_trait)]
pub trait EventSource {
    /// Load records, surfacing why a load failed.
    async fn fetch(&self) -> Result<Vec<EventRecord>, FeedError>;

    /// Load records, logging any failure and returning an empty list instead.
    ///
    /// An empty result means either "no events" or "load failed"; use
    /// [`EventSource::fetch`] to tell the two apart.
    async fn load(&self) -> Vec<EventRecord> {
        match self.fetch().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Event load failed, continuing with no events");
                Vec::new()
            }
        }
    }
}
