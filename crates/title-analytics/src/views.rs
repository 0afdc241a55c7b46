//! Declarative dashboard views.
//!
//! A [`ViewSpec`] names one aggregate (dimension, null policy, limit) and a
//! [`DashboardSpec`] is an ordered list of them. Presentation layers render
//! the [`ViewResult`]s; nothing here knows about charts.
//!
//! ```rust,ignore
//! use title_analytics::{AnalyticsConfig, DashboardSpec, load_catalog};
//!
//! let loaded = load_catalog(path)?;
//! let results = DashboardSpec::default_dashboard()
//!     .evaluate(&AnalyticsConfig::default(), &loaded.catalog)?;
//! println!("{}", serde_json::to_string_pretty(&results)?);
//! ```

use crate::aggregate::{
    Aggregator, CrossTabCell, Dimension, FrequencyEntry, Granularity, PercentageTable, TimeSeries,
};
use crate::catalog::Catalog;
use crate::config::{AnalyticsConfig, MAX_HISTOGRAM_BINS};
use crate::error::{AnalyticsError, Result, ResultExt};
use crate::stats::{
    HeadlineMetrics, Histogram, Statistic, histogram, mean_movie_minutes, mean_show_seasons,
};
use crate::types::TitleKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Numeric runtime measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Movie runtime in minutes.
    Minutes,
    /// TV show season count.
    Seasons,
}

/// What a view computes.
///
/// `top_n` and `bins` fall back to the configured defaults when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewQuery {
    Frequency {
        dimension: Dimension,
        #[serde(default)]
        include_unknown: bool,
        #[serde(default)]
        top_n: Option<usize>,
    },
    CrossTab {
        a: Dimension,
        b: Dimension,
        #[serde(default)]
        top_n: Option<usize>,
    },
    Percentage {
        dimension: Dimension,
        #[serde(default)]
        include_unknown: bool,
    },
    TimeSeries {
        granularity: Granularity,
    },
    Mean {
        metric: Metric,
    },
    Histogram {
        metric: Metric,
        #[serde(default)]
        bins: Option<usize>,
    },
    Headline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSpec {
    pub id: String,
    pub title: String,
    pub query: ViewQuery,
}

impl ViewSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>, query: ViewQuery) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            query,
        }
    }
}

/// Computed output of one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ViewOutput {
    Frequency(Vec<FrequencyEntry>),
    CrossTab(Vec<CrossTabCell>),
    Percentage(PercentageTable),
    TimeSeries(TimeSeries),
    Mean(Statistic),
    Histogram(Histogram),
    Headline(HeadlineMetrics),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewResult {
    pub id: String,
    pub title: String,
    pub output: ViewOutput,
}

/// An ordered list of views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSpec {
    pub views: Vec<ViewSpec>,
}

impl DashboardSpec {
    /// Overview and detail views of a streaming catalog.
    pub fn default_dashboard() -> Self {
        let views = vec![
            ViewSpec::new("headline", "Catalog at a glance", ViewQuery::Headline),
            ViewSpec::new(
                "top_countries",
                "Top countries by number of titles",
                ViewQuery::Frequency {
                    dimension: Dimension::Country,
                    include_unknown: false,
                    top_n: None,
                },
            ),
            ViewSpec::new(
                "type_split",
                "Movies vs TV shows",
                ViewQuery::Percentage {
                    dimension: Dimension::Kind,
                    include_unknown: false,
                },
            ),
            ViewSpec::new(
                "added_per_year",
                "Titles added per year",
                ViewQuery::TimeSeries {
                    granularity: Granularity::Year,
                },
            ),
            ViewSpec::new(
                "release_years",
                "Titles by release year",
                ViewQuery::TimeSeries {
                    granularity: Granularity::ReleaseYear,
                },
            ),
            ViewSpec::new(
                "type_by_country",
                "Titles by type and country",
                ViewQuery::CrossTab {
                    a: Dimension::Kind,
                    b: Dimension::Country,
                    top_n: Some(20),
                },
            ),
            ViewSpec::new(
                "top_genres",
                "Top genres",
                ViewQuery::Frequency {
                    dimension: Dimension::Genre,
                    include_unknown: false,
                    top_n: None,
                },
            ),
            ViewSpec::new(
                "top_cast",
                "Most featured actors",
                ViewQuery::Frequency {
                    dimension: Dimension::Cast,
                    include_unknown: false,
                    top_n: None,
                },
            ),
            ViewSpec::new(
                "added_per_month",
                "Titles added per month",
                ViewQuery::TimeSeries {
                    granularity: Granularity::Month,
                },
            ),
            ViewSpec::new(
                "added_per_quarter",
                "Titles added per quarter",
                ViewQuery::TimeSeries {
                    granularity: Granularity::Quarter,
                },
            ),
            ViewSpec::new(
                "movie_durations",
                "Movie duration distribution",
                ViewQuery::Histogram {
                    metric: Metric::Minutes,
                    bins: None,
                },
            ),
            ViewSpec::new(
                "season_counts",
                "TV shows by number of seasons",
                ViewQuery::Frequency {
                    dimension: Dimension::Seasons,
                    include_unknown: false,
                    top_n: None,
                },
            ),
            ViewSpec::new(
                "mean_minutes",
                "Average movie duration (minutes)",
                ViewQuery::Mean {
                    metric: Metric::Minutes,
                },
            ),
            ViewSpec::new(
                "mean_seasons",
                "Average number of seasons",
                ViewQuery::Mean {
                    metric: Metric::Seasons,
                },
            ),
        ];

        Self { views }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let spec: DashboardSpec = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(AnalyticsError::from)
            .context(format!("Failed to read view file {}", path.display()))?;
        Self::from_json(&json).context(format!("Failed to load views from {}", path.display()))
    }

    /// Reject blank or duplicate ids and zero limits.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for view in &self.views {
            if view.id.trim().is_empty() {
                return Err(AnalyticsError::ViewSpec("view id cannot be empty".into()));
            }
            if !seen.insert(view.id.as_str()) {
                return Err(AnalyticsError::ViewSpec(format!(
                    "duplicate view id '{}'",
                    view.id
                )));
            }
            match view.query {
                ViewQuery::Frequency { top_n: Some(0), .. }
                | ViewQuery::CrossTab { top_n: Some(0), .. } => {
                    return Err(AnalyticsError::ViewSpec(format!(
                        "view '{}': top_n must be at least 1",
                        view.id
                    )));
                }
                ViewQuery::Histogram {
                    bins: Some(bins), ..
                } if bins == 0 || bins > MAX_HISTOGRAM_BINS => {
                    return Err(AnalyticsError::ViewSpec(format!(
                        "view '{}': bins must be between 1 and {}",
                        view.id, MAX_HISTOGRAM_BINS
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Evaluate every view against `catalog`, in order.
    pub fn evaluate(&self, config: &AnalyticsConfig, catalog: &Catalog) -> Result<Vec<ViewResult>> {
        self.validate()?;
        let aggregator = Aggregator::new(config);
        Ok(self
            .views
            .iter()
            .map(|view| evaluate_view(view, config, &aggregator, catalog))
            .collect())
    }
}

/// Compute a single view.
pub fn evaluate_view(
    view: &ViewSpec,
    config: &AnalyticsConfig,
    aggregator: &Aggregator,
    catalog: &Catalog,
) -> ViewResult {
    debug!("Evaluating view '{}' over {} records", view.id, catalog.len());

    let output = match &view.query {
        ViewQuery::Frequency {
            dimension,
            include_unknown,
            top_n,
        } => {
            let nulls = aggregator.null_policy(*include_unknown);
            let table = aggregator.count(catalog, *dimension, &nulls);
            ViewOutput::Frequency(table.top_n(top_n.unwrap_or(config.top_n)))
        }
        ViewQuery::CrossTab { a, b, top_n } => {
            let tab = aggregator.cross_tab(catalog, *a, *b);
            ViewOutput::CrossTab(tab.top(top_n.unwrap_or(config.top_n)).to_vec())
        }
        ViewQuery::Percentage {
            dimension,
            include_unknown,
        } => {
            let nulls = aggregator.null_policy(*include_unknown);
            ViewOutput::Percentage(aggregator.percentage_distribution(catalog, *dimension, &nulls))
        }
        ViewQuery::TimeSeries { granularity } => {
            ViewOutput::TimeSeries(aggregator.time_series(catalog, *granularity))
        }
        ViewQuery::Mean { metric } => ViewOutput::Mean(match metric {
            Metric::Minutes => mean_movie_minutes(catalog),
            Metric::Seasons => mean_show_seasons(catalog),
        }),
        ViewQuery::Histogram { metric, bins } => {
            let bins = bins.unwrap_or(config.histogram_bins);
            ViewOutput::Histogram(histogram(metric_values(catalog, *metric), bins))
        }
        ViewQuery::Headline => ViewOutput::Headline(HeadlineMetrics::from_catalog(catalog)),
    };

    ViewResult {
        id: view.id.clone(),
        title: view.title.clone(),
        output,
    }
}

fn metric_values(catalog: &Catalog, metric: Metric) -> impl Iterator<Item = Option<f64>> + '_ {
    let kind = match metric {
        Metric::Minutes => TitleKind::Movie,
        Metric::Seasons => TitleKind::TvShow,
    };
    catalog
        .iter()
        .filter(move |r| r.kind == kind)
        .map(move |r| {
            match metric {
                Metric::Minutes => r.minutes(),
                Metric::Seasons => r.seasons(),
            }
            .map(f64::from)
        })
}
