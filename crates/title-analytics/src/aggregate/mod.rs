//! Aggregate views over a catalog.
//!
//! Everything here is a pure function of its inputs. The [`Aggregator`]
//! only carries the settings that decide how keys are extracted (list
//! delimiter, country interpretation, null bucket label).

mod crosstab;
mod filter;
mod frequency;
mod timeseries;

pub use crosstab::{CrossTab, CrossTabCell};
pub use filter::{CatalogFilter, YearRange, filter_catalog};
pub use frequency::{
    FrequencyEntry, FrequencyTable, NullPolicy, PercentageEntry, PercentageTable, count_by,
};
pub use timeseries::{Granularity, TimeBucket, TimeSeries, time_series};

use crate::catalog::Catalog;
use crate::config::{AnalyticsConfig, CountryMode};
use crate::expand::{ExplodedRelation, ListField, split_tokens};
use crate::types::{TitleKind, TitleRecord};
use frequency::Tally;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

/// A categorical key extracted from each record.
///
/// `Genre` and `Cast` are multi-valued, as is `Country` when countries are
/// split; such dimensions contribute one key per token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Kind,
    Country,
    ReleaseYear,
    YearAdded,
    MonthAdded,
    QuarterAdded,
    Genre,
    Cast,
    /// Only defined for TV shows.
    Seasons,
}

impl Dimension {
    /// Whether `record` can carry a key on this dimension at all.
    ///
    /// Records outside the domain are skipped rather than counted as null.
    pub fn applies_to(&self, record: &TitleRecord) -> bool {
        match self {
            Dimension::Seasons => record.kind == TitleKind::TvShow,
            _ => true,
        }
    }
}

/// Computes aggregates with a fixed key-extraction setup.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregator {
    list_delimiter: String,
    country_mode: CountryMode,
    unknown_label: String,
}

static_assertions::assert_impl_all!(Aggregator: Send, Sync);

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(&AnalyticsConfig::default())
    }
}

impl Aggregator {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            list_delimiter: config.list_delimiter.clone(),
            country_mode: config.country_mode,
            unknown_label: config.unknown_label.clone(),
        }
    }

    pub fn country_mode(&self) -> CountryMode {
        self.country_mode
    }

    /// Null policy for a call site: bucket nulls under the configured label,
    /// or drop them.
    pub fn null_policy(&self, include_unknown: bool) -> NullPolicy {
        if include_unknown {
            NullPolicy::Bucket(self.unknown_label.clone())
        } else {
            NullPolicy::Exclude
        }
    }

    /// Keys of `record` on `dimension`. Empty means the key is null.
    pub fn keys<'r>(&self, dimension: Dimension, record: &'r TitleRecord) -> Vec<Cow<'r, str>> {
        match dimension {
            Dimension::Kind => vec![Cow::Borrowed(record.kind.label())],
            Dimension::Country => match (record.country.as_deref(), self.country_mode) {
                (None, _) => Vec::new(),
                (Some(raw), CountryMode::Atomic) => vec![Cow::Borrowed(raw)],
                (Some(raw), CountryMode::Split) => {
                    split_tokens(raw, ",").map(Cow::Borrowed).collect()
                }
            },
            Dimension::ReleaseYear => owned(record.release_year),
            Dimension::YearAdded => owned(record.year_added()),
            Dimension::MonthAdded => record
                .added
                .map(|p| Cow::Borrowed(p.month_name()))
                .into_iter()
                .collect(),
            Dimension::QuarterAdded => record
                .quarter_added()
                .map(|q| Cow::Owned(format!("Q{q}")))
                .into_iter()
                .collect(),
            Dimension::Genre => split_tokens(&record.listed_in, &self.list_delimiter)
                .map(Cow::Borrowed)
                .collect(),
            Dimension::Cast => split_tokens(&record.cast, &self.list_delimiter)
                .map(Cow::Borrowed)
                .collect(),
            Dimension::Seasons => owned(record.seasons()),
        }
    }

    /// Frequency of `dimension` over `catalog`.
    ///
    /// A record with no key on a multi-valued dimension counts once as null.
    /// Records the dimension does not apply to are not counted.
    pub fn count(
        &self,
        catalog: &Catalog,
        dimension: Dimension,
        nulls: &NullPolicy,
    ) -> FrequencyTable {
        let mut tally = Tally::new(nulls);
        for record in catalog.iter().filter(|r| dimension.applies_to(r)) {
            let keys = self.keys(dimension, record);
            if keys.is_empty() {
                tally.add(None);
            }
            for key in &keys {
                tally.add(Some(key.as_ref()));
            }
        }
        tally.finish()
    }

    /// Split a list field of every record using the configured delimiter.
    pub fn explode<'a>(&self, catalog: &'a Catalog, field: ListField) -> ExplodedRelation<'a> {
        let delimiter = match field {
            ListField::Country => ",",
            ListField::Genres | ListField::Cast => self.list_delimiter.as_str(),
        };
        ExplodedRelation::build(catalog, field, delimiter)
    }

    /// Frequency of tokens in an exploded relation.
    pub fn count_tokens(&self, relation: &ExplodedRelation<'_>) -> FrequencyTable {
        count_by(relation.tokens(), |token| Some(*token), &NullPolicy::Exclude)
    }

    /// Sparse joint counts of two dimensions.
    ///
    /// Records with a null key on either side are left out.
    pub fn cross_tab(&self, catalog: &Catalog, a: Dimension, b: Dimension) -> CrossTab {
        let mut counts: HashMap<(String, String), usize> = HashMap::new();
        for record in catalog {
            let keys_a = self.keys(a, record);
            let keys_b = self.keys(b, record);
            for key_a in &keys_a {
                for key_b in &keys_b {
                    *counts
                        .entry((key_a.to_string(), key_b.to_string()))
                        .or_insert(0) += 1;
                }
            }
        }
        CrossTab::from_counts((a, b), counts)
    }

    /// Percentage of each `dimension` key.
    ///
    /// Empty when nothing contributes: an empty catalog, or one where every
    /// key is null and `nulls` excludes them. The empty table has a total and
    /// sum of zero.
    pub fn percentage_distribution(
        &self,
        catalog: &Catalog,
        dimension: Dimension,
        nulls: &NullPolicy,
    ) -> PercentageTable {
        self.count(catalog, dimension, nulls).percentages()
    }

    pub fn time_series(&self, catalog: &Catalog, granularity: Granularity) -> TimeSeries {
        time_series(catalog, granularity)
    }

    pub fn filter(&self, catalog: &Catalog, filter: &CatalogFilter) -> Catalog {
        filter_catalog(catalog, filter, self.country_mode)
    }

    /// Sorted distinct countries, the option list of a country selector.
    pub fn distinct_countries(&self, catalog: &Catalog) -> Vec<String> {
        let countries: BTreeSet<String> = catalog
            .iter()
            .flat_map(|r| self.keys(Dimension::Country, r))
            .map(Cow::into_owned)
            .collect();
        countries.into_iter().collect()
    }
}

fn owned<'r, T: ToString>(value: Option<T>) -> Vec<Cow<'r, str>> {
    value.map(|v| Cow::Owned(v.to_string())).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{RawRow, normalize_rows};
    use pretty_assertions::assert_eq;

    fn row(title: &str, kind: &str, country: &str, added: &str) -> RawRow {
        RawRow::new()
            .with("title", title)
            .with("type", kind)
            .with("country", country)
            .with("date_added", added)
    }

    fn catalog() -> Catalog {
        normalize_rows(vec![
            row("m1", "Movie", "India", "January 5, 2016")
                .with("listed_in", "Dramas, International Movies")
                .with("release_year", "2015"),
            row("m2", "Movie", "United States", "March 1, 2019")
                .with("listed_in", "Comedies")
                .with("release_year", "2019"),
            row("m3", "Movie", "India", "July 9, 2021")
                .with("listed_in", "Dramas")
                .with("release_year", "2020"),
            row("s1", "TV Show", "India", "February 2, 2018")
                .with("listed_in", "International TV Shows, Dramas")
                .with("duration", "2 Seasons"),
            row("s2", "TV Show", "United States, India", "")
                .with("duration", "1 Season"),
            row("m4", "Movie", "", "March 20, 2017").with("listed_in", "Comedies"),
        ])
        .catalog
    }

    #[test]
    fn test_count_kind() {
        let agg = Aggregator::default();
        let table = agg.count(&catalog(), Dimension::Kind, &NullPolicy::Exclude);
        assert_eq!(table.get("Movie"), Some(4));
        assert_eq!(table.get("TV Show"), Some(2));
    }

    #[test]
    fn test_count_country_null_policies() {
        let agg = Aggregator::default();
        let catalog = catalog();

        let excluded = agg.count(&catalog, Dimension::Country, &agg.null_policy(false));
        assert_eq!(excluded.total(), 5);
        assert_eq!(excluded.get("Unknown"), None);

        let bucketed = agg.count(&catalog, Dimension::Country, &agg.null_policy(true));
        assert_eq!(bucketed.total(), 6);
        assert_eq!(bucketed.get("Unknown"), Some(1));
        assert_eq!(bucketed.get("United States, India"), Some(1));
    }

    #[test]
    fn test_split_country_mode_counts_each_country() {
        let config = AnalyticsConfig::builder()
            .country_mode(CountryMode::Split)
            .build()
            .unwrap();
        let agg = Aggregator::new(&config);
        let table = agg.count(&catalog(), Dimension::Country, &NullPolicy::Exclude);

        assert_eq!(table.get("India"), Some(4));
        assert_eq!(table.get("United States"), Some(2));
        assert_eq!(table.get("United States, India"), None);
    }

    #[test]
    fn test_genre_count_matches_relation() {
        let agg = Aggregator::default();
        let catalog = catalog();

        let via_dimension = agg.count(&catalog, Dimension::Genre, &NullPolicy::Exclude);
        let relation = agg.explode(&catalog, ListField::Genres);
        let via_relation = agg.count_tokens(&relation);

        assert_eq!(via_dimension, via_relation);
        assert_eq!(via_dimension.get("Dramas"), Some(3));
        assert_eq!(
            via_dimension.top_n(2)[0],
            FrequencyEntry {
                key: "Dramas".into(),
                count: 3
            }
        );
    }

    #[test]
    fn test_genre_unknown_only_when_requested() {
        let agg = Aggregator::default();
        let catalog = catalog();
        assert_eq!(
            agg.count(&catalog, Dimension::Genre, &NullPolicy::Exclude)
                .get("Unknown"),
            None
        );
        assert_eq!(
            agg.count(&catalog, Dimension::Genre, &agg.null_policy(true))
                .get("Unknown"),
            Some(1)
        );
    }

    #[test]
    fn test_cross_tab_is_sparse() {
        let agg = Aggregator::default();
        let tab = agg.cross_tab(&catalog(), Dimension::Kind, Dimension::Country);

        assert_eq!(tab.get("Movie", "India"), Some(2));
        assert_eq!(tab.get("TV Show", "India"), Some(1));
        assert_eq!(tab.get("TV Show", "United States"), None);
        assert!(tab.cells.iter().all(|c| c.count > 0));
        // m4 has no country
        assert_eq!(tab.total(), 5);
        assert_eq!(tab.top(1)[0].count, 2);
    }

    #[test]
    fn test_percentage_distribution() {
        let agg = Aggregator::default();
        let pct = agg.percentage_distribution(&catalog(), Dimension::Kind, &NullPolicy::Exclude);
        assert!((pct.sum() - 100.0).abs() < 0.01);
        assert!((pct.get("Movie").unwrap() - 66.666_666).abs() < 0.01);

        let empty = agg.percentage_distribution(
            &Catalog::default(),
            Dimension::Kind,
            &NullPolicy::Exclude,
        );
        assert!(empty.is_empty());
    }

    #[test]
    fn test_percentage_distribution_when_every_key_is_null() {
        let agg = Aggregator::default();
        let movies = agg.filter(&catalog(), &CatalogFilter::new().kinds([TitleKind::Movie]));
        let pct = agg.percentage_distribution(&movies, Dimension::Cast, &NullPolicy::Exclude);

        assert!(!movies.is_empty());
        assert!(pct.is_empty());
        assert_eq!(pct.total, 0);
        assert_eq!(pct.sum(), 0.0);
    }

    #[test]
    fn test_seasons_count_only_tv_shows() {
        let agg = Aggregator::default();
        let catalog = normalize_rows(vec![
            row("m1", "Movie", "India", "").with("duration", "90 min"),
            row("m2", "Movie", "India", "").with("duration", "100 min"),
            row("s1", "TV Show", "Japan", "").with("duration", "2 Seasons"),
            row("s2", "TV Show", "Japan", ""),
        ])
        .catalog;

        let bucketed = agg.count(&catalog, Dimension::Seasons, &agg.null_policy(true));
        assert_eq!(
            bucketed.entries(),
            &[
                FrequencyEntry {
                    key: "2".into(),
                    count: 1
                },
                FrequencyEntry {
                    key: "Unknown".into(),
                    count: 1
                },
            ]
        );

        let excluded = agg.count(&catalog, Dimension::Seasons, &NullPolicy::Exclude);
        assert_eq!(excluded.total(), 1);
        assert!(!Dimension::Seasons.applies_to(&catalog.records()[0]));
        assert!(Dimension::Kind.applies_to(&catalog.records()[0]));
    }

    #[test]
    fn test_month_series_has_twelve_buckets() {
        let catalog = catalog();
        let series = time_series(&catalog, Granularity::Month);

        let labels: Vec<&str> = series.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "January", "February", "March", "April", "May", "June", "July", "August",
                "September", "October", "November", "December"
            ]
        );
        assert_eq!(series.get("March"), Some(2));
        assert_eq!(series.get("December"), Some(0));

        let dated = catalog.iter().filter(|r| r.added.is_some()).count();
        assert_eq!(series.total(), dated);
    }

    #[test]
    fn test_month_series_of_empty_catalog() {
        let series = time_series(&Catalog::default(), Granularity::Month);
        assert_eq!(series.buckets.len(), 12);
        assert_eq!(series.total(), 0);
    }

    #[test]
    fn test_year_and_quarter_series_are_observed_and_ascending() {
        let catalog = catalog();

        let years = time_series(&catalog, Granularity::Year);
        let labels: Vec<&str> = years.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2016", "2017", "2018", "2019", "2021"]);

        let quarters = time_series(&catalog, Granularity::Quarter);
        let labels: Vec<&str> = quarters.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Q1", "Q3"]);
        assert_eq!(quarters.get("Q1"), Some(4));

        let released = time_series(&catalog, Granularity::ReleaseYear);
        assert_eq!(released.buckets.first().map(|b| b.label.as_str()), Some("2015"));
    }

    #[test]
    fn test_filter_conjunction() {
        let agg = Aggregator::default();
        let filter = CatalogFilter::new()
            .kinds([TitleKind::Movie])
            .countries(["India"])
            .year_added(2015, 2020);
        let filtered = agg.filter(&catalog(), &filter);

        let titles: Vec<&str> = filtered.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["m1"]);
        for record in &filtered {
            assert_eq!(record.kind, TitleKind::Movie);
            assert_eq!(record.country.as_deref(), Some("India"));
            assert!((2015..=2020).contains(&record.year_added().unwrap()));
        }
    }

    #[test]
    fn test_empty_filter_returns_catalog_unchanged() {
        let agg = Aggregator::default();
        let catalog = catalog();
        assert_eq!(agg.filter(&catalog, &CatalogFilter::new()), catalog);
    }

    #[test]
    fn test_filter_with_empty_kind_set_matches_nothing() {
        let agg = Aggregator::default();
        let filter = CatalogFilter::new().kinds([]);
        assert!(agg.filter(&catalog(), &filter).is_empty());
    }

    #[test]
    fn test_filter_split_country_membership() {
        let config = AnalyticsConfig::builder()
            .country_mode(CountryMode::Split)
            .build()
            .unwrap();
        let agg = Aggregator::new(&config);
        let filter = CatalogFilter::new().countries(["United States"]);
        let titles: Vec<String> = agg
            .filter(&catalog(), &filter)
            .iter()
            .map(|r| r.title.clone())
            .collect();
        assert_eq!(titles, vec!["m2".to_string(), "s2".to_string()]);
    }

    #[test]
    fn test_distinct_countries_sorted() {
        let agg = Aggregator::default();
        assert_eq!(
            agg.distinct_countries(&catalog()),
            vec!["India", "United States", "United States, India"]
        );
    }
}
