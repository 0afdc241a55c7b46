//! Configuration types for the analytics pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! The only externally sourced setting is the catalog location, which the
//! CLI resolves separately; everything here shapes how aggregates are built.

use serde::{Deserialize, Serialize};

/// Default number of entries kept by top-N rankings.
pub const DEFAULT_TOP_N: usize = 10;

/// Default number of equal-width histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Upper bound on histogram bins.
pub const MAX_HISTOGRAM_BINS: usize = 10_000;

/// Default label of the explicit null bucket.
pub const DEFAULT_UNKNOWN_LABEL: &str = "Unknown";

/// Default separator of multi-valued fields such as `listed_in` and `cast`.
pub const DEFAULT_LIST_DELIMITER: &str = ", ";

/// How the `country` column is interpreted for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CountryMode {
    /// The whole cell is one value; "India, Japan" is its own country.
    #[default]
    Atomic,
    /// The cell is split on commas and each country counts separately.
    Split,
}

/// Configuration for the analytics pipeline.
///
/// Use [`AnalyticsConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use title_analytics::config::{AnalyticsConfig, CountryMode};
///
/// let config = AnalyticsConfig::builder()
///     .top_n(15)
///     .country_mode(CountryMode::Split)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Number of entries kept by top-N views.
    /// Default: 10
    pub top_n: usize,

    /// Number of bins used by histogram views.
    /// Default: 30
    pub histogram_bins: usize,

    /// Label of the bucket that collects null keys when a view asks for it.
    /// Default: "Unknown"
    pub unknown_label: String,

    /// Separator used to split genre and cast lists.
    /// Default: ", "
    pub list_delimiter: String,

    /// Interpretation of the country column.
    /// Default: Atomic
    pub country_mode: CountryMode,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            unknown_label: DEFAULT_UNKNOWN_LABEL.to_string(),
            list_delimiter: DEFAULT_LIST_DELIMITER.to_string(),
            country_mode: CountryMode::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalyticsConfigBuilder {
        AnalyticsConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_n == 0 {
            return Err(ConfigValidationError::InvalidTopN(self.top_n));
        }

        if self.histogram_bins == 0 || self.histogram_bins > MAX_HISTOGRAM_BINS {
            return Err(ConfigValidationError::InvalidBins(self.histogram_bins));
        }

        if self.unknown_label.trim().is_empty() {
            return Err(ConfigValidationError::EmptyField("unknown_label".to_string()));
        }

        if self.list_delimiter.is_empty() {
            return Err(ConfigValidationError::EmptyField("list_delimiter".to_string()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid top N: {0} (must be at least 1)")]
    InvalidTopN(usize),

    #[error("Invalid histogram bins: {0} (must be between 1 and {max})", max = MAX_HISTOGRAM_BINS)]
    InvalidBins(usize),

    #[error("Field '{0}' must not be empty")]
    EmptyField(String),
}

/// Builder for [`AnalyticsConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalyticsConfigBuilder {
    top_n: Option<usize>,
    histogram_bins: Option<usize>,
    unknown_label: Option<String>,
    list_delimiter: Option<String>,
    country_mode: Option<CountryMode>,
}

impl AnalyticsConfigBuilder {
    /// Set how many entries top-N views keep.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the label of the explicit null bucket.
    pub fn unknown_label(mut self, label: impl Into<String>) -> Self {
        self.unknown_label = Some(label.into());
        self
    }

    /// Set the separator of multi-valued list fields.
    pub fn list_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.list_delimiter = Some(delimiter.into());
        self
    }

    /// Choose whether composite country cells are split.
    pub fn country_mode(mut self, mode: CountryMode) -> Self {
        self.country_mode = Some(mode);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalyticsConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalyticsConfig, ConfigValidationError> {
        let config = AnalyticsConfig {
            top_n: self.top_n.unwrap_or(DEFAULT_TOP_N),
            histogram_bins: self.histogram_bins.unwrap_or(DEFAULT_HISTOGRAM_BINS),
            unknown_label: self
                .unknown_label
                .unwrap_or_else(|| DEFAULT_UNKNOWN_LABEL.to_string()),
            list_delimiter: self
                .list_delimiter
                .unwrap_or_else(|| DEFAULT_LIST_DELIMITER.to_string()),
            country_mode: self.country_mode.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
