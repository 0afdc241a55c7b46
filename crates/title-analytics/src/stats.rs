//! Null-aware summary statistics.

use crate::catalog::Catalog;
use crate::types::TitleKind;
use polars::prelude::*;
use serde::Serialize;

/// Result of a statistic that may have no defined value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Statistic {
    Value(f64),
    /// No non-null input contributed.
    Undefined,
}

impl Statistic {
    pub fn value(&self) -> Option<f64> {
        match self {
            Statistic::Value(v) => Some(*v),
            Statistic::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Statistic::Undefined)
    }
}

impl From<Option<f64>> for Statistic {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Statistic::Undefined, Statistic::Value)
    }
}

/// Arithmetic mean of the non-null values.
pub fn mean(values: impl IntoIterator<Item = Option<f64>>) -> Statistic {
    let values: Vec<Option<f64>> = values.into_iter().collect();
    let series = Series::new("values".into(), values);
    series.mean().into()
}

/// Mean runtime in minutes over movies with a known runtime.
pub fn mean_movie_minutes(catalog: &Catalog) -> Statistic {
    mean(
        catalog
            .iter()
            .filter(|r| r.kind == TitleKind::Movie)
            .map(|r| r.minutes().map(f64::from)),
    )
}

/// Mean season count over TV shows with a known season count.
pub fn mean_show_seasons(catalog: &Catalog) -> Statistic {
    mean(
        catalog
            .iter()
            .filter(|r| r.kind == TitleKind::TvShow)
            .map(|r| r.seasons().map(f64::from)),
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeadlineMetrics {
    pub total: usize,
    pub movies: usize,
    pub tv_shows: usize,
}

impl HeadlineMetrics {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let movies = catalog
            .iter()
            .filter(|r| r.kind == TitleKind::Movie)
            .count();
        Self {
            total: catalog.len(),
            movies,
            tv_shows: catalog.len() - movies,
        }
    }
}

/// Half-open bin `[lower, upper)`; the last bin also includes `upper`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Equal-width histogram of the non-null values.
///
/// Empty input or `bins == 0` yields an empty histogram. When every value is
/// equal there is a single bin holding all of them.
pub fn histogram(values: impl IntoIterator<Item = Option<f64>>, bins: usize) -> Histogram {
    let values: Vec<f64> = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() || bins == 0 {
        return Histogram::default();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return Histogram {
            bins: vec![HistogramBin {
                lower: min,
                upper: max,
                count: values.len(),
            }],
        };
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in &values {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram {
        bins: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: min + width * i as f64,
                upper: if i == bins - 1 {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count,
            })
            .collect(),
    }
}
