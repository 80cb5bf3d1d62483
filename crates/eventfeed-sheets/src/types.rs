//! Wire types for the spreadsheet JSON export.
//!
//! The export looks like
//! `{"status":"ok","table":{"rows":[{"c":[{"v":..,"f":".."},null]}]}}`.
//! Rows are sparse: a cell may be `null` or missing from the end of `c`.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// Parsed response object (after the callback wrapper has been stripped).
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    pub status: Option<String>,
    #[serde(default)]
    pub errors: Vec<FeedMessage>,
    pub table: Option<Table>,
}

/// Error or warning entry reported by the export endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeedMessage {
    pub reason: Option<String>,
    pub message: Option<String>,
    pub detailed_message: Option<String>,
}

impl fmt::Display for FeedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = self.reason.as_deref().unwrap_or("unknown");
        match self.detailed_message.as_deref().or(self.message.as_deref()) {
            Some(msg) => write!(f, "{}: {}", reason, msg),
            None => write!(f, "{}", reason),
        }
    }
}

/// The row table. Column metadata (`cols`) is ignored; positions come from
/// the configured column map.
#[derive(Debug, Deserialize)]
pub struct Table {
    pub rows: Option<Vec<Row>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Row {
    pub c: Option<Vec<Option<Cell>>>,
}

/// A single cell: the raw value plus the sheet's formatted rendering of it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Cell {
    pub v: Option<CellValue>,
    pub f: Option<String>,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            v: Some(value.into()),
            f: None,
        }
    }

    pub fn formatted(value: impl Into<CellValue>, formatted: impl Into<String>) -> Self {
        Self {
            v: Some(value.into()),
            f: Some(formatted.into()),
        }
    }

    /// Trimmed text for string columns.
    ///
    /// The formatted value wins when the cell has one; a cell without a raw
    /// value reads as empty.
    pub fn text(&self) -> String {
        match (&self.v, &self.f) {
            (None, _) => String::new(),
            (Some(_), Some(formatted)) => formatted.trim().to_string(),
            (Some(value), None) => value.to_string().trim().to_string(),
        }
    }
}

/// Raw cell value.
///
/// `Date` never comes off the wire; it exists for callers that build rows
/// from already-typed data.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            // Whole numbers print without a fractional part ("2024", not "2024.0")
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) => CellValue::Text(s),
            serde_json::Value::Number(n) => CellValue::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::Bool(b) => CellValue::Bool(b),
            other => CellValue::Text(other.to_string()),
        })
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}
