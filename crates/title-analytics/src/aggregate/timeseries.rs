//! Counts of catalog records bucketed by a time unit.

use crate::catalog::Catalog;
use crate::types::MONTHS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Time unit of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// Year the title was added.
    Year,
    /// Calendar month the title was added, across all years.
    Month,
    /// Calendar quarter the title was added, across all years.
    Quarter,
    /// Year the title was originally released.
    ReleaseYear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBucket {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeries {
    pub granularity: Granularity,
    pub buckets: Vec<TimeBucket>,
}

impl TimeSeries {
    pub fn get(&self, label: &str) -> Option<usize> {
        self.buckets
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.count)
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// Bucket `catalog` by `granularity`.
///
/// Months always yield twelve buckets January to December, zeros included.
/// Every other unit yields only observed values in ascending order. Records
/// whose date (or release year) is unknown are not counted.
pub fn time_series(catalog: &Catalog, granularity: Granularity) -> TimeSeries {
    let buckets = match granularity {
        Granularity::Month => {
            let mut counts = [0usize; 12];
            for month in catalog.iter().filter_map(|r| r.month_added()) {
                counts[month.number_from_month() as usize - 1] += 1;
            }
            MONTHS
                .iter()
                .zip(counts)
                .map(|(month, count)| TimeBucket {
                    label: month.name().to_string(),
                    count,
                })
                .collect()
        }
        Granularity::Year => observed(catalog.iter().filter_map(|r| r.year_added()), |y| {
            y.to_string()
        }),
        Granularity::Quarter => observed(catalog.iter().filter_map(|r| r.quarter_added()), |q| {
            format!("Q{q}")
        }),
        Granularity::ReleaseYear => observed(catalog.iter().filter_map(|r| r.release_year), |y| {
            y.to_string()
        }),
    };

    TimeSeries {
        granularity,
        buckets,
    }
}

fn observed<K, I, L>(values: I, label: L) -> Vec<TimeBucket>
where
    K: Ord,
    I: Iterator<Item = K>,
    L: Fn(&K) -> String,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
        .iter()
        .map(|(value, count)| TimeBucket {
            label: label(value),
            count: *count,
        })
        .collect()
}
