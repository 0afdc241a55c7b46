//! Frequency tables, top-N rankings and percentage distributions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// What to do with entries whose key is null or blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullPolicy {
    /// Leave them out of the table entirely.
    Exclude,
    /// Count them under an explicit bucket with this label.
    Bucket(String),
}

impl NullPolicy {
    pub fn includes_nulls(&self) -> bool {
        matches!(self, NullPolicy::Bucket(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub key: String,
    pub count: usize,
}

/// Distinct key to count, stored in ascending key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.entries
            .binary_search_by(|e| e.key.as_str().cmp(key))
            .ok()
            .map(|idx| self.entries[idx].count)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// All entries by count descending, ties broken by ascending key.
    pub fn ranked(&self) -> Vec<FrequencyEntry> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
        ranked
    }

    /// At most `n` entries in ranked order; `n == 0` gives nothing.
    pub fn top_n(&self, n: usize) -> Vec<FrequencyEntry> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// Share of each key in percent of [`total`](Self::total).
    pub fn percentages(&self) -> PercentageTable {
        let total = self.total();
        if total == 0 {
            return PercentageTable::default();
        }

        let entries = self
            .entries
            .iter()
            .map(|e| PercentageEntry {
                key: e.key.clone(),
                count: e.count,
                percentage: 100.0 * e.count as f64 / total as f64,
            })
            .collect();

        PercentageTable { total, entries }
    }
}

/// Accumulates keys into a [`FrequencyTable`].
#[derive(Debug)]
pub(crate) struct Tally<'p> {
    nulls: &'p NullPolicy,
    counts: HashMap<String, usize>,
}

impl<'p> Tally<'p> {
    pub(crate) fn new(nulls: &'p NullPolicy) -> Self {
        Self {
            nulls,
            counts: HashMap::new(),
        }
    }

    pub(crate) fn add(&mut self, key: Option<&str>) {
        match key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => *self.counts.entry(key.to_string()).or_insert(0) += 1,
            None => {
                if let NullPolicy::Bucket(label) = self.nulls {
                    *self.counts.entry(label.clone()).or_insert(0) += 1;
                }
            }
        }
    }

    pub(crate) fn finish(self) -> FrequencyTable {
        let sorted: BTreeMap<String, usize> = self.counts.into_iter().collect();
        FrequencyTable {
            entries: sorted
                .into_iter()
                .map(|(key, count)| FrequencyEntry { key, count })
                .collect(),
        }
    }
}

/// Count the key produced by `key_fn` for every item of `source`.
///
/// A `None` or blank key is handled according to `nulls`.
pub fn count_by<T, I, F, K>(source: I, mut key_fn: F, nulls: &NullPolicy) -> FrequencyTable
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> Option<K>,
    K: AsRef<str>,
{
    let mut tally = Tally::new(nulls);
    for item in source {
        let key = key_fn(&item);
        tally.add(key.as_ref().map(|k| <K as AsRef<str>>::as_ref(k)));
    }
    tally.finish()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentageEntry {
    pub key: String,
    pub count: usize,
    pub percentage: f64,
}

/// Key to percentage of the contributing total; empty when nothing contributed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PercentageTable {
    pub total: usize,
    pub entries: Vec<PercentageEntry>,
}

impl PercentageTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.percentage)
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|e| e.percentage).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(key: &str, count: usize) -> FrequencyEntry {
        FrequencyEntry {
            key: key.to_string(),
            count,
        }
    }

    fn sample() -> FrequencyTable {
        count_by(
            ["b", "a", "c", "a", "b", "d"],
            |s| Some(*s),
            &NullPolicy::Exclude,
        )
    }

    #[test]
    fn test_count_by_sorted_by_key() {
        let table = sample();
        assert_eq!(
            table.entries(),
            &[entry("a", 2), entry("b", 2), entry("c", 1), entry("d", 1)]
        );
        assert_eq!(table.total(), 6);
        assert_eq!(table.get("b"), Some(2));
        assert_eq!(table.get("z"), None);
    }

    #[test]
    fn test_null_policy_changes_totals() {
        let values = [Some("x"), None, Some(""), Some("x"), Some("  ")];

        let excluded = count_by(values, |v| *v, &NullPolicy::Exclude);
        assert_eq!(excluded.total(), 2);
        assert_eq!(excluded.len(), 1);

        let bucketed = count_by(values, |v| *v, &NullPolicy::Bucket("Unknown".into()));
        assert_eq!(bucketed.total(), 5);
        assert_eq!(bucketed.get("Unknown"), Some(3));
    }

    #[test]
    fn test_top_n_orders_by_count_then_key() {
        assert_eq!(
            sample().top_n(3),
            vec![entry("a", 2), entry("b", 2), entry("c", 1)]
        );
    }

    #[test]
    fn test_top_n_bounds() {
        let table = sample();
        assert!(table.top_n(0).is_empty());
        assert_eq!(table.top_n(100).len(), table.len());
        assert!(FrequencyTable::default().top_n(5).is_empty());
    }

    #[test]
    fn test_top_n_is_non_increasing() {
        let table = count_by(
            ["q", "w", "w", "e", "e", "e", "r", "t", "t"],
            |s| Some(*s),
            &NullPolicy::Exclude,
        );
        let top = table.top_n(4);
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(
            top.windows(2)
                .all(|w| w[0].count > w[1].count || w[0].key < w[1].key)
        );
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let pct = count_by(["a", "b", "b"], |s| Some(*s), &NullPolicy::Exclude).percentages();
        assert!((pct.sum() - 100.0).abs() < 0.01);
        assert!((pct.get("b").unwrap() - 66.666).abs() < 0.01);
        assert_eq!(pct.total, 3);
    }

    #[test]
    fn test_percentages_of_empty_table() {
        let pct = FrequencyTable::default().percentages();
        assert!(pct.is_empty());
        assert_eq!(pct.total, 0);
    }
}
