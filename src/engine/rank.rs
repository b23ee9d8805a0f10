//! Reusable rank table
//!
//! Orders the objects of one matrix row by ascending distance. Equal
//! distances are ordered by object index so every ranking is reproducible.

use std::cmp::Ordering;

/// Scratch buffer of `(distance, object)` pairs
#[derive(Debug, Clone, Default)]
pub(crate) struct RankTable {
    entries: Vec<(f64, usize)>,
}

impl RankTable {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
        }
    }

    /// Rank the objects of `row` from closest to farthest.
    pub(crate) fn rank_row(&mut self, row: &[f64]) -> &[(f64, usize)] {
        self.entries.clear();
        self.entries
            .extend(row.iter().enumerate().map(|(object, &d)| (d, object)));
        // The key is total over finite distances, so an unstable sort is
        // still deterministic.
        self.entries.sort_unstable_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });
        &self.entries
    }
}
