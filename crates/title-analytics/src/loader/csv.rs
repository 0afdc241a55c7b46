//! CSV reading and writing through polars.

use super::{RawRow, normalize_rows};
use crate::catalog::{Catalog, LoadedCatalog};
use crate::error::{AnalyticsError, Result, ResultExt};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read a catalog file into a DataFrame with every column as a string.
///
/// Tries standard quote handling first, then no quote handling, then a
/// pre-cleaned copy of the file content.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(AnalyticsError::DataSourceNotFound(path.to_path_buf()));
    }

    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            warn!("Standard CSV loading failed: {}", e);
        }
    }

    // Strategy 2: Without quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            warn!("Loading without quotes failed: {}", e);
        }
    }

    // Strategy 3: Pre-clean content
    let content = std::fs::read_to_string(path)?;
    let cursor = Cursor::new(clean_csv_content(&content));

    CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .into_reader_with_file_handle(cursor)
        .finish()
        .context(format!("Failed to parse {}", path.display()))
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert every DataFrame row into a [`RawRow`]. Null cells are left out.
pub fn rows_from_dataframe(df: &DataFrame) -> Result<Vec<RawRow>> {
    let mut rows = vec![RawRow::new(); df.height()];

    for column in df.get_columns() {
        let name = column.name().to_string();
        let as_str = column
            .as_materialized_series()
            .cast(&DataType::String)
            .context(format!("Casting column '{}' to string", name))?;

        for (row, value) in rows.iter_mut().zip(as_str.str()?.into_iter()) {
            if let Some(value) = value {
                row.insert(name.as_str(), value);
            }
        }
    }

    Ok(rows)
}

/// Load and normalize a catalog file.
///
/// Fails only when the file is missing or unreadable; bad rows are skipped
/// and counted in [`LoadedCatalog::skipped_rows`].
pub fn load_catalog(path: &Path) -> Result<LoadedCatalog> {
    info!("Loading catalog from: {}", path.display());

    let df = read_csv(path)?;
    debug!("Raw table shape: {:?}", df.shape());

    let mut loaded = normalize_rows(rows_from_dataframe(&df)?);
    loaded.source = Some(path.to_path_buf());

    info!(
        "Catalog loaded: {} records, {} rows skipped",
        loaded.catalog.len(),
        loaded.skipped_rows
    );
    Ok(loaded)
}

/// Build a DataFrame of the normalized catalog including derived columns.
pub fn catalog_to_dataframe(catalog: &Catalog) -> Result<DataFrame> {
    let records = catalog.records();

    let title: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    let kind: Vec<&str> = records.iter().map(|r| r.kind.label()).collect();
    let country: Vec<Option<&str>> = records.iter().map(|r| r.country.as_deref()).collect();
    let date_added: Vec<Option<String>> = records
        .iter()
        .map(|r| r.date_added().map(|d| d.format("%Y-%m-%d").to_string()))
        .collect();
    let release_year: Vec<Option<i32>> = records.iter().map(|r| r.release_year).collect();
    let listed_in: Vec<&str> = records.iter().map(|r| r.listed_in.as_str()).collect();
    let cast: Vec<&str> = records.iter().map(|r| r.cast.as_str()).collect();
    let duration: Vec<Option<&str>> = records.iter().map(|r| r.duration.as_deref()).collect();
    let description: Vec<Option<&str>> =
        records.iter().map(|r| r.description.as_deref()).collect();
    let year_added: Vec<Option<i32>> = records.iter().map(|r| r.year_added()).collect();
    let month_added: Vec<Option<&str>> = records
        .iter()
        .map(|r| r.added.map(|p| p.month_name()))
        .collect();
    let quarter_added: Vec<Option<u32>> = records
        .iter()
        .map(|r| r.quarter_added().map(u32::from))
        .collect();
    let minutes: Vec<Option<u32>> = records.iter().map(|r| r.minutes()).collect();
    let seasons: Vec<Option<u32>> = records.iter().map(|r| r.seasons()).collect();

    let df = DataFrame::new(vec![
        Column::new("title".into(), title),
        Column::new("type".into(), kind),
        Column::new("country".into(), country),
        Column::new("date_added".into(), date_added),
        Column::new("release_year".into(), release_year),
        Column::new("listed_in".into(), listed_in),
        Column::new("cast".into(), cast),
        Column::new("duration".into(), duration),
        Column::new("description".into(), description),
        Column::new("year_added".into(), year_added),
        Column::new("month_added".into(), month_added),
        Column::new("quarter_added".into(), quarter_added),
        Column::new("minutes".into(), minutes),
        Column::new("seasons".into(), seasons),
    ])?;

    Ok(df)
}

/// Write the normalized catalog as CSV.
pub fn write_csv(catalog: &Catalog, path: &Path) -> Result<()> {
    let mut df = catalog_to_dataframe(catalog)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context(format!("Writing {}", path.display()))?;

    info!("Catalog written: {} ({} rows)", path.display(), df.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_csv_content() {
        let cleaned = clean_csv_content("a,b\n\n\"\"x\"\",1\n   \n");
        assert_eq!(cleaned, "a,b\n\"x\",1");
    }

    #[test]
    fn test_rows_from_dataframe_skips_nulls() {
        let df = DataFrame::new(vec![
            Column::new("title".into(), vec![Some("Alpha"), None]),
            Column::new("type".into(), vec![Some("Movie"), Some("TV Show")]),
        ])
        .unwrap();

        let rows = rows_from_dataframe(&df).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("title"), Some("Alpha"));
        assert_eq!(rows[1].get("title"), None);
        assert_eq!(rows[1].get("type"), Some("TV Show"));
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let err = read_csv(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(err.is_data_source_not_found());
    }

    #[test]
    fn test_catalog_to_dataframe_has_derived_columns() {
        let loaded = normalize_rows(vec![
            RawRow::new()
                .with("title", "A")
                .with("type", "Movie")
                .with("date_added", "March 3, 2019")
                .with("duration", "100 min"),
            RawRow::new()
                .with("title", "B")
                .with("type", "TV Show")
                .with("duration", "2 Seasons"),
        ]);

        let df = catalog_to_dataframe(&loaded.catalog).unwrap();
        assert_eq!(df.shape(), (2, 14));

        let minutes = df.column("minutes").unwrap().as_materialized_series().clone();
        assert_eq!(minutes.null_count(), 1);
        let month = df.column("month_added").unwrap().as_materialized_series().clone();
        assert_eq!(month.str().unwrap().get(0), Some("March"));
        assert_eq!(month.str().unwrap().get(1), None);
    }
}
