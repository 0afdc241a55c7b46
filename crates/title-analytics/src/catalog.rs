//! The immutable, ordered collection of normalized title records.

use crate::types::{RecordId, TitleRecord};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// An ordered, read-only sequence of [`TitleRecord`]s.
///
/// Cloning is cheap: clones share the same record storage. Operations that
/// narrow a catalog build a new one and leave the original untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Arc<[TitleRecord]>,
}

static_assertions::assert_impl_all!(Catalog: Send, Sync);

impl Catalog {
    pub fn new(records: Vec<TitleRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TitleRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TitleRecord> {
        self.records.iter()
    }

    /// Iterate records together with their position in this catalog.
    pub fn entries(&self) -> impl Iterator<Item = (RecordId, &TitleRecord)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(idx, record)| (RecordId(idx), record))
    }

    pub fn get(&self, id: RecordId) -> Option<&TitleRecord> {
        self.records.get(id.0)
    }

    /// Build a new catalog holding the records that satisfy `keep`, in order.
    pub fn retain_where<F>(&self, mut keep: F) -> Catalog
    where
        F: FnMut(&TitleRecord) -> bool,
    {
        Catalog::new(self.records.iter().filter(|r| keep(r)).cloned().collect())
    }

    /// The first `n` records in catalog order.
    pub fn preview(&self, n: usize) -> &[TitleRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Records ordered by release year, newest first.
    ///
    /// The sort is stable; records without a release year come last.
    pub fn by_release_year_desc(&self) -> Vec<&TitleRecord> {
        let mut sorted: Vec<&TitleRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.release_year.cmp(&a.release_year));
        sorted
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TitleRecord;
    type IntoIter = std::slice::Iter<'a, TitleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<TitleRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = TitleRecord>>(iter: I) -> Self {
        Catalog::new(iter.into_iter().collect())
    }
}

impl Serialize for Catalog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.records.iter())
    }
}

/// A catalog together with what happened while loading it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    /// Rows dropped because `title` or `type` was missing or unrecognized.
    pub skipped_rows: usize,
    /// File the catalog was read from, if any.
    pub source: Option<PathBuf>,
}

static_assertions::assert_impl_all!(LoadedCatalog: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Runtime, TitleKind};

    fn record(title: &str, release_year: Option<i32>) -> TitleRecord {
        TitleRecord {
            title: title.to_string(),
            kind: TitleKind::Movie,
            country: None,
            added: None,
            release_year,
            listed_in: String::new(),
            cast: String::new(),
            duration: None,
            description: None,
            runtime: Runtime::Minutes(None),
        }
    }

    #[test]
    fn test_retain_where_leaves_original_untouched() {
        let catalog = Catalog::new(vec![
            record("a", Some(2001)),
            record("b", Some(2002)),
            record("c", Some(2003)),
        ]);
        let recent = catalog.retain_where(|r| r.release_year >= Some(2002));

        assert_eq!(recent.len(), 2);
        assert_eq!(catalog.len(), 3);
        assert_eq!(recent.records()[0].title, "b");
    }

    #[test]
    fn test_entries_index_matches_get() {
        let catalog = Catalog::new(vec![record("a", None), record("b", None)]);
        for (id, r) in catalog.entries() {
            assert_eq!(catalog.get(id), Some(r));
        }
        assert_eq!(catalog.get(RecordId(2)), None);
    }

    #[test]
    fn test_preview_clamps() {
        let catalog = Catalog::new(vec![record("a", None), record("b", None)]);
        assert_eq!(catalog.preview(1).len(), 1);
        assert_eq!(catalog.preview(10).len(), 2);
        assert!(Catalog::default().preview(3).is_empty());
    }

    #[test]
    fn test_by_release_year_desc_is_stable() {
        let catalog = Catalog::new(vec![
            record("old", Some(1999)),
            record("first-2020", Some(2020)),
            record("unknown", None),
            record("second-2020", Some(2020)),
        ]);
        let titles: Vec<&str> = catalog
            .by_release_year_desc()
            .into_iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first-2020", "second-2020", "old", "unknown"]);
    }
}
