//! Spreadsheet event feed for Eventfeed.
//!
//! Fetches the tabular JSON export of a spreadsheet, normalizes each row into
//! an [`EventRecord`] and orders the result most recent first.

pub mod client;
pub mod date;
pub mod error;
pub mod event;
pub mod fixtures;
pub mod row;
pub mod source;
pub mod types;

pub use client::FeedLoader;
pub use error::{FeedError, RowRejection};
pub use event::EventRecord;
pub use fixtures::StaticSource;
pub use row::{parse_row, ColumnLayout, ColumnMap, RowParser, DEFAULT_PLACEHOLDER_IMAGE};
pub use source::EventSource;
pub use types::{Cell, CellValue, FeedResponse, Row, Table};
