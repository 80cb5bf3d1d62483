//! Spreadsheet feed client.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tracing::instrument;

use crate::error::{FeedError, RowRejection};
use crate::event::{sort_most_recent_first, EventRecord};
use crate::row::RowParser;
use crate::source::EventSource;
use crate::types::FeedResponse;

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const MAX_ERROR_BODY_CHARS: usize = 200;
const USER_AGENT: &str = concat!("eventfeed/", env!("CARGO_PKG_VERSION"));

/// Fetches the sheet export and turns it into sorted event records.
///
/// Every call goes to the network; nothing is cached between loads.
#[derive(Debug, Clone)]
pub struct FeedLoader {
    client: reqwest::Client,
    endpoint: String,
    parser: RowParser,
}

impl FeedLoader {
    pub fn new(endpoint: &str, parser: RowParser) -> Result<Self, FeedError> {
        Self::with_timeout(endpoint, parser, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        endpoint: &str,
        parser: RowParser,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            parser,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the raw response body.
    async fn fetch_body(&self) -> Result<String, FeedError> {
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status {
                status: status.as_u16(),
                body: error_snippet(&body),
            });
        }

        let text = response.text().await?;
        tracing::debug!(bytes = text.len(), "Feed response received");
        Ok(text)
    }
}

impl EventSource for FeedLoader {
    #[instrument(skip(self), level = "info")]
    async fn fetch(&self) -> Result<Vec<EventRecord>, FeedError> {
        tracing::debug!(endpoint = %self.endpoint, "Fetching event feed");
        let body = self.fetch_body().await?;
        parse_body(&body, &self.parser, Local::now().naive_local())
    }
}

/// First line of an error body, shortened for log output.
fn error_snippet(body: &str) -> String {
    let line = body.trim().lines().next().unwrap_or_default();
    let mut snippet: String = line.chars().take(MAX_ERROR_BODY_CHARS).collect();
    if line.chars().count() > MAX_ERROR_BODY_CHARS {
        snippet.push_str("...");
    }
    snippet
}

/// Cut the JSON object out of the callback wrapper: everything from the
/// first `{` to the last `}`.
pub fn extract_json(body: &str) -> Result<&str, FeedError> {
    let start = body
        .find('{')
        .ok_or_else(|| FeedError::Envelope("no opening brace".to_string()))?;
    let end = body
        .rfind('}')
        .ok_or_else(|| FeedError::Envelope("no closing brace".to_string()))?;

    if end < start {
        return Err(FeedError::Envelope("braces out of order".to_string()));
    }
    Ok(&body[start..=end])
}

/// Parse a full response body into sorted records.
///
/// Rows that fail the title and date checks are dropped with one debug
/// event each.
pub fn parse_body(
    body: &str,
    parser: &RowParser,
    now: NaiveDateTime,
) -> Result<Vec<EventRecord>, FeedError> {
    let response: FeedResponse = serde_json::from_str(extract_json(body)?)?;

    if response.status.as_deref() == Some("error") {
        let reasons = response
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(FeedError::Upstream(reasons));
    }

    let rows = response
        .table
        .and_then(|t| t.rows)
        .ok_or(FeedError::MissingTable)?;

    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = 0usize;

    for (index, row) in rows.iter().enumerate() {
        let outcome = match &row.c {
            Some(cells) => parser.parse_at(cells, now),
            None => Err(RowRejection::NoCells),
        };
        match outcome {
            Ok(record) => records.push(record),
            Err(reason) => {
                rejected += 1;
                tracing::debug!(row = index, reason = %reason, "Row rejected");
            }
        }
    }

    tracing::info!(
        rows = rows.len(),
        accepted = records.len(),
        rejected,
        "Parsed event feed"
    );

    sort_most_recent_first(&mut records);
    Ok(records)
}
