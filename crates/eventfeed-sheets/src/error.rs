//! Feed-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No JSON object found in response ({0})")]
    Envelope(String),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response has no row table")]
    MissingTable,

    #[error("Feed reported an error: {0}")]
    Upstream(String),
}

impl FeedError {
    /// User-friendly error message for display next to an empty event list.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(_) => "Unable to reach the events sheet. Check your connection.",
            Self::Status { status, .. } if *status >= 500 => {
                "The events sheet is unavailable right now. Please try again later."
            }
            Self::Status { .. } => "The events sheet could not be opened. Check that it is shared.",
            Self::Envelope(_) | Self::Json(_) | Self::MissingTable => {
                "The events sheet returned data in an unexpected format."
            }
            Self::Upstream(_) => "The events sheet reported an error.",
        }
    }

    /// Transport failures and non-success HTTP statuses.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }

    /// The body arrived but could not be read as a row table.
    pub fn is_parse(&self) -> bool {
        !self.is_network()
    }
}

/// Why a single row did not become an event.
///
/// Rejections are a filtering outcome, not a failure of the load.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    #[error("row has no cells")]
    NoCells,

    #[error("missing date")]
    MissingDate,

    #[error("missing title")]
    MissingTitle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = FeedError::Status {
            status: 404,
            body: String::new(),
        };
        assert!(err.is_network());
        assert!(!err.is_parse());

        assert!(FeedError::MissingTable.is_parse());
        assert!(FeedError::Envelope("empty body".into()).is_parse());
        assert!(FeedError::Upstream("ACCESS_DENIED".into()).is_parse());
    }

    #[test]
    fn test_user_messages() {
        let err = FeedError::Status {
            status: 503,
            body: String::new(),
        };
        assert!(err.user_message().contains("try again later"));

        let err = FeedError::Status {
            status: 403,
            body: String::new(),
        };
        assert!(err.user_message().contains("shared"));

        assert!(FeedError::MissingTable.user_message().contains("unexpected format"));
    }

    #[test]
    fn test_rejection_reasons() {
        assert_eq!(RowRejection::MissingTitle.to_string(), "missing title");
        assert_eq!(RowRejection::MissingDate.to_string(), "missing date");
    }
}
