//! Conjunctive record predicates.

use crate::catalog::Catalog;
use crate::config::CountryMode;
use crate::expand::split_tokens;
use crate::types::{TitleKind, TitleRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive range of years added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    pub fn new(from: i32, to: i32) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.from..=self.to).contains(&year)
    }
}

/// Predicates combined with AND. A `None` field places no constraint;
/// an empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub kinds: Option<BTreeSet<TitleKind>>,
    pub countries: Option<BTreeSet<String>>,
    pub year_added: Option<YearRange>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = TitleKind>) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }

    pub fn countries<S: Into<String>>(mut self, countries: impl IntoIterator<Item = S>) -> Self {
        self.countries = Some(countries.into_iter().map(Into::into).collect());
        self
    }

    pub fn year_added(mut self, from: i32, to: i32) -> Self {
        self.year_added = Some(YearRange::new(from, to));
        self
    }

    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_none() && self.countries.is_none() && self.year_added.is_none()
    }

    /// Whether `record` satisfies every predicate.
    ///
    /// A record without a known year added never satisfies a year range.
    pub fn matches(&self, record: &TitleRecord, country_mode: CountryMode) -> bool {
        if let Some(kinds) = &self.kinds
            && !kinds.contains(&record.kind)
        {
            return false;
        }

        if let Some(countries) = &self.countries
            && !country_matches(record, countries, country_mode)
        {
            return false;
        }

        if let Some(range) = &self.year_added
            && !record.year_added().is_some_and(|y| range.contains(y))
        {
            return false;
        }

        true
    }
}

fn country_matches(record: &TitleRecord, countries: &BTreeSet<String>, mode: CountryMode) -> bool {
    let Some(raw) = record.country.as_deref() else {
        return false;
    };
    match mode {
        CountryMode::Atomic => countries.contains(raw),
        CountryMode::Split => split_tokens(raw, ",").any(|c| countries.contains(c)),
    }
}

/// Records of `catalog` matching `filter`, in catalog order.
///
/// An empty filter returns the catalog itself.
pub fn filter_catalog(
    catalog: &Catalog,
    filter: &CatalogFilter,
    country_mode: CountryMode,
) -> Catalog {
    if filter.is_empty() {
        return catalog.clone();
    }
    catalog.retain_where(|record| filter.matches(record, country_mode))
}
