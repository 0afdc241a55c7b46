//! Title Catalog Analytics Library
//!
//! Descriptive analytics over a catalog of movie and TV titles, built with
//! Rust and Polars.
//!
//! # Overview
//!
//! The pipeline has three stages:
//!
//! - **Loading**: read a CSV export, normalize each row into a typed
//!   [`TitleRecord`], skip rows without a title or a recognized type
//! - **Expansion**: split multi-valued fields (genres, cast, countries) into
//!   one entry per token, each pointing back at its record
//! - **Aggregation**: frequency tables, top-N rankings, cross tabulations,
//!   percentage distributions, time series, filters and summary statistics
//!
//! Every aggregate is a pure function of the catalog it is given. Nothing is
//! cached unless you ask for it through [`CatalogCache`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use title_analytics::{Aggregator, AnalyticsConfig, CatalogFilter, Dimension, TitleKind};
//! use std::path::Path;
//!
//! let loaded = title_analytics::load_catalog(Path::new("titles.csv"))?;
//! let aggregator = Aggregator::new(&AnalyticsConfig::default());
//!
//! let indian_movies = aggregator.filter(
//!     &loaded.catalog,
//!     &CatalogFilter::new()
//!         .kinds([TitleKind::Movie])
//!         .countries(["India"])
//!         .year_added(2015, 2020),
//! );
//!
//! let genres = aggregator.count(&indian_movies, Dimension::Genre, &aggregator.null_policy(false));
//! for entry in genres.top_n(10) {
//!     println!("{}: {}", entry.key, entry.count);
//! }
//! ```
//!
//! # Configuration
//!
//! Use [`AnalyticsConfig`] to customize key extraction and view defaults:
//!
//! ```rust,ignore
//! use title_analytics::config::*;
//!
//! let config = AnalyticsConfig::builder()
//!     .top_n(15)                          // Default top-N for ranked views
//!     .histogram_bins(20)                 // Default histogram bin count
//!     .country_mode(CountryMode::Split)   // Count each listed country
//!     .build()?;
//! ```
//!
//! # Dashboards
//!
//! [`DashboardSpec`] bundles declarative [`ViewSpec`]s. The built-in
//! [`DashboardSpec::default_dashboard`] covers the usual overview; custom
//! dashboards can be loaded from JSON.

pub mod aggregate;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod duration;
pub mod error;
pub mod expand;
pub mod loader;
pub mod stats;
pub mod types;
pub mod views;

// Re-exports for convenient access
pub use aggregate::{
    Aggregator, CatalogFilter, CrossTab, CrossTabCell, Dimension, FrequencyEntry, FrequencyTable,
    Granularity, NullPolicy, PercentageEntry, PercentageTable, TimeBucket, TimeSeries, YearRange,
    count_by, filter_catalog, time_series,
};
pub use cache::CatalogCache;
pub use catalog::{Catalog, LoadedCatalog};
pub use config::{AnalyticsConfig, AnalyticsConfigBuilder, ConfigValidationError, CountryMode};
pub use duration::{leading_number, parse_runtime};
pub use error::{AnalyticsError, Result as AnalyticsResult, ResultExt};
pub use expand::{ExplodedRelation, ListField, RelationEntry, split_tokens};
pub use loader::{
    RawRow, catalog_to_dataframe, load_catalog, normalize_row, normalize_rows, read_csv, write_csv,
};
pub use stats::{
    HeadlineMetrics, Histogram, HistogramBin, Statistic, histogram, mean, mean_movie_minutes,
    mean_show_seasons,
};
pub use types::{AddedPeriod, RecordId, Runtime, TitleKind, TitleRecord};
pub use views::{DashboardSpec, Metric, ViewOutput, ViewQuery, ViewResult, ViewSpec, evaluate_view};
