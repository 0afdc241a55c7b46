//! Sparse joint counts over two categorical dimensions.

use super::Dimension;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTabCell {
    pub a: String,
    pub b: String,
    pub count: usize,
}

/// Observed `(a, b)` combinations with their counts.
///
/// Combinations that never occur are absent. Cells are ordered by count
/// descending, then by `a` and `b` ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTab {
    pub dimensions: (Dimension, Dimension),
    pub cells: Vec<CrossTabCell>,
}

impl CrossTab {
    pub(crate) fn from_counts(
        dimensions: (Dimension, Dimension),
        counts: HashMap<(String, String), usize>,
    ) -> Self {
        let mut cells: Vec<CrossTabCell> = counts
            .into_iter()
            .map(|((a, b), count)| CrossTabCell { a, b, count })
            .collect();
        cells.sort_by(|x, y| {
            y.count
                .cmp(&x.count)
                .then_with(|| x.a.cmp(&y.a))
                .then_with(|| x.b.cmp(&y.b))
        });
        Self { dimensions, cells }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<usize> {
        self.cells
            .iter()
            .find(|c| c.a == a && c.b == b)
            .map(|c| c.count)
    }

    /// Sum of all cell counts.
    pub fn total(&self) -> usize {
        self.cells.iter().map(|c| c.count).sum()
    }

    /// The `n` largest cells.
    pub fn top(&self, n: usize) -> &[CrossTabCell] {
        &self.cells[..n.min(self.cells.len())]
    }
}
