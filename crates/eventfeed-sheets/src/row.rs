//! Row parsing: one sparse sheet row in, one [`EventRecord`] (or a rejection) out.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::date;
use crate::error::RowRejection;
use crate::event::EventRecord;
use crate::types::{Cell, CellValue};

pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "images/placeholder.png";

/// Known sheet layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnLayout {
    /// Form-response sheet: column 0 holds the submission timestamp and is
    /// ignored; the last column is the publish flag.
    #[default]
    FormResponses,
    /// Hand-maintained sheet without a timestamp or publish column.
    Simple,
}

impl ColumnLayout {
    pub fn column_map(self) -> ColumnMap {
        match self {
            Self::FormResponses => ColumnMap::form_responses(),
            Self::Simple => ColumnMap::simple(),
        }
    }
}

/// Which column index holds which event field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub date: usize,
    /// Separate ordering date; the display date is reused when unset.
    pub sort_date: Option<usize>,
    pub title: usize,
    pub description: usize,
    pub image: usize,
    pub alt: usize,
    pub publish: Option<usize>,
}

impl ColumnMap {
    pub const fn form_responses() -> Self {
        Self {
            date: 1,
            sort_date: Some(2),
            title: 3,
            description: 4,
            image: 5,
            alt: 6,
            publish: Some(7),
        }
    }

    pub const fn simple() -> Self {
        Self {
            date: 0,
            sort_date: Some(1),
            title: 2,
            description: 3,
            image: 4,
            alt: 5,
            publish: None,
        }
    }

    /// All (role, index) pairs that are mapped.
    pub fn roles(&self) -> Vec<(&'static str, usize)> {
        let mut roles = vec![
            ("date", self.date),
            ("title", self.title),
            ("description", self.description),
            ("image", self.image),
            ("alt", self.alt),
        ];
        if let Some(i) = self.sort_date {
            roles.push(("sort_date", i));
        }
        if let Some(i) = self.publish {
            roles.push(("publish", i));
        }
        roles
    }

    /// Pairs of roles mapped to the same column.
    pub fn conflicts(&self) -> Vec<(&'static str, &'static str, usize)> {
        let roles = self.roles();
        let mut conflicts = Vec::new();
        for (i, (a, index_a)) in roles.iter().enumerate() {
            for (b, index_b) in &roles[i + 1..] {
                if index_a == index_b {
                    conflicts.push((*a, *b, *index_a));
                }
            }
        }
        conflicts
    }
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self::form_responses()
    }
}

/// Raw value of a cell; absent index, `null` cell and `{"v": null}` all read as `None`.
fn raw_value(cells: &[Option<Cell>], index: usize) -> Option<&CellValue> {
    cells.get(index)?.as_ref()?.v.as_ref()
}

fn text(cells: &[Option<Cell>], index: usize) -> String {
    cells
        .get(index)
        .and_then(Option::as_ref)
        .map(Cell::text)
        .unwrap_or_default()
}

/// Turns sheet rows into event records according to a [`ColumnMap`].
#[derive(Debug, Clone)]
pub struct RowParser {
    columns: ColumnMap,
    placeholder_image: String,
}

impl RowParser {
    pub fn new(columns: ColumnMap) -> Self {
        Self {
            columns,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }

    pub fn with_placeholder_image(mut self, image: impl Into<String>) -> Self {
        self.placeholder_image = image.into();
        self
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Parse one row, using the current local time when no date is usable
    /// for ordering.
    pub fn parse(&self, cells: &[Option<Cell>]) -> Result<EventRecord, RowRejection> {
        self.parse_at(cells, Local::now().naive_local())
    }

    /// Parse one row with an explicit fallback sort key.
    pub fn parse_at(
        &self,
        cells: &[Option<Cell>],
        now: NaiveDateTime,
    ) -> Result<EventRecord, RowRejection> {
        let cols = &self.columns;

        let raw_date = raw_value(cells, cols.date);
        let raw_sort = match cols.sort_date {
            Some(index) => raw_value(cells, index),
            None => raw_date,
        };

        let date = raw_date.and_then(date::normalize);
        let sort_date = raw_sort.and_then(date::normalize);

        let display_date = match &date {
            Some(d) => date::format(d),
            None => raw_date
                .map(|v| v.to_string().trim().to_string())
                .unwrap_or_default(),
        };
        let sort_key = sort_date.or(date).unwrap_or(now);

        let title = text(cells, cols.title);

        if display_date.is_empty() {
            return Err(RowRejection::MissingDate);
        }
        if title.is_empty() {
            return Err(RowRejection::MissingTitle);
        }

        let description = text(cells, cols.description);
        let image = Some(text(cells, cols.image))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.placeholder_image.clone());
        let alt = Some(text(cells, cols.alt))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| title.clone());
        let published = cols
            .publish
            .is_some_and(|index| text(cells, index).to_lowercase() == "yes");

        Ok(EventRecord {
            display_date,
            sort_key,
            title,
            description,
            image,
            alt,
            published,
        })
    }
}

/// Parse a row with the default placeholder image; `None` when the row is
/// rejected.
pub fn parse_row(cells: &[Option<Cell>], columns: &ColumnMap) -> Option<EventRecord> {
    RowParser::new(*columns).parse(cells).ok()
}
