//! Loading and normalization of raw catalog rows.
//!
//! Raw rows map column names to cells. Normalization turns each row into a
//! [`TitleRecord`], deriving the added-date dimensions and the parsed
//! runtime. Rows without a usable `title` or `type` are skipped and counted;
//! every other defect only nulls the affected field.

mod csv;
pub mod dates;

pub use self::csv::{catalog_to_dataframe, load_catalog, read_csv, rows_from_dataframe, write_csv};

use crate::catalog::{Catalog, LoadedCatalog};
use crate::duration::parse_runtime;
use crate::types::{AddedPeriod, TitleKind, TitleRecord};
use dates::parse_flexible_date;
use std::collections::HashMap;
use tracing::debug;

/// Source column names.
pub mod columns {
    pub const TITLE: &str = "title";
    pub const TYPE: &str = "type";
    pub const COUNTRY: &str = "country";
    pub const DATE_ADDED: &str = "date_added";
    pub const RELEASE_YEAR: &str = "release_year";
    pub const LISTED_IN: &str = "listed_in";
    pub const CAST: &str = "cast";
    pub const DURATION: &str = "duration";
    pub const DESCRIPTION: &str = "description";
}

/// One unparsed input row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for constructing rows by hand.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Trimmed cell value; blank and absent cells are both `None`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

/// Normalize one row, or `None` when a required column is missing.
pub fn normalize_row(row: &RawRow) -> Option<TitleRecord> {
    let title = row.get(columns::TITLE)?;
    let kind = TitleKind::parse(row.get(columns::TYPE)?)?;

    let duration = row.get(columns::DURATION).map(str::to_string);
    let runtime = parse_runtime(kind, duration.as_deref());

    Some(TitleRecord {
        title: title.to_string(),
        kind,
        country: row.get(columns::COUNTRY).map(str::to_string),
        added: row
            .get(columns::DATE_ADDED)
            .and_then(parse_flexible_date)
            .map(AddedPeriod::from_date),
        release_year: row
            .get(columns::RELEASE_YEAR)
            .and_then(|v| v.parse::<i32>().ok()),
        listed_in: row.get(columns::LISTED_IN).unwrap_or_default().to_string(),
        cast: row.get(columns::CAST).unwrap_or_default().to_string(),
        duration,
        description: row.get(columns::DESCRIPTION).map(str::to_string),
        runtime,
    })
}

/// Normalize a sequence of rows into a catalog, counting skipped rows.
pub fn normalize_rows<I>(rows: I) -> LoadedCatalog
where
    I: IntoIterator<Item = RawRow>,
{
    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for (idx, row) in rows.into_iter().enumerate() {
        match normalize_row(&row) {
            Some(record) => records.push(record),
            None => {
                skipped_rows += 1;
                debug!(
                    "Skipping row {}: missing or unrecognized title/type (title={:?}, type={:?})",
                    idx,
                    row.get(columns::TITLE),
                    row.get(columns::TYPE)
                );
            }
        }
    }

    LoadedCatalog {
        catalog: Catalog::new(records),
        skipped_rows,
        source: None,
    }
}
