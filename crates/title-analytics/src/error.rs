//! Error types for the catalog analytics pipeline.
//!
//! Only [`AnalyticsError::DataSourceNotFound`] is meant to reach an end user
//! verbatim. Row-level and field-level problems never surface as errors: they
//! are absorbed by the loader (skipped rows, null fields) and by the
//! aggregator (empty tables, undefined statistics).
//!
//! Errors are serializable so a presentation layer can receive them as
//! `{ "code": ..., "message": ... }`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the analytics pipeline.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// The catalog source file does not exist.
    #[error("Data source not found: {}", .0.display())]
    DataSourceNotFound(PathBuf),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A view descriptor could not be parsed or evaluated.
    #[error("Invalid view specification: {0}")]
    ViewSpec(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalyticsError>,
    },
}

impl AnalyticsError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalyticsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DataSourceNotFound(_) => "DATA_SOURCE_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ViewSpec(_) => "INVALID_VIEW_SPEC",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the input source was missing, looking through any context layers.
    pub fn is_data_source_not_found(&self) -> bool {
        match self {
            Self::DataSourceNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_data_source_not_found(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for AnalyticsError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        AnalyticsError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalyticsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalyticsError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalyticsError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            AnalyticsError::DataSourceNotFound(PathBuf::from("titles.csv")).error_code(),
            "DATA_SOURCE_NOT_FOUND"
        );
        assert_eq!(
            AnalyticsError::ViewSpec("unknown dimension".to_string()).error_code(),
            "INVALID_VIEW_SPEC"
        );
    }

    #[test]
    fn test_not_found_message_names_path() {
        let error = AnalyticsError::DataSourceNotFound(PathBuf::from("missing/titles.csv"));
        assert!(error.to_string().contains("missing/titles.csv"));
    }

    #[test]
    fn test_is_data_source_not_found_through_context() {
        let error = AnalyticsError::DataSourceNotFound(PathBuf::from("x.csv"))
            .with_context("Loading catalog");
        assert!(error.is_data_source_not_found());
        assert!(!AnalyticsError::InvalidConfig("bad".into()).is_data_source_not_found());
    }

    #[test]
    fn test_error_serialization() {
        let error = AnalyticsError::InvalidConfig("top_n must be at least 1".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("INVALID_CONFIG"));
        assert!(json.contains("top_n"));
    }

    #[test]
    fn test_with_context() {
        let error = AnalyticsError::ViewSpec("empty id".to_string()).with_context("During load");
        assert!(error.to_string().contains("During load"));
        assert_eq!(error.error_code(), "INVALID_VIEW_SPEC");
    }
}
