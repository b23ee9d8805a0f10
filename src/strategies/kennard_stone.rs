//! Rank-based Kennard–Stone selection over a precomputed matrix
//!
//! Runs the same information engine as [`MostDescriptive`](super::MostDescriptive)
//! but borrows the caller's matrix for its whole lifetime, so objects can be
//! pulled one at a time with [`KennardStone::next_object`] and the batch
//! loop picked up later with [`KennardStone::select`].

use crate::engine::{GreedySelector, InformationVector, SelectionObserver};
use crate::errors::Result;
use crate::matrix::DistanceMatrix;
use crate::types::{SelectorConfig, StopReason};

/// Incremental Kennard–Stone selector
#[derive(Debug, Clone)]
pub struct KennardStone<'m> {
    selector: GreedySelector<'m>,
}

impl<'m> KennardStone<'m> {
    /// Prepare a selection of `target_count` objects (`0` = autostop).
    pub fn new(matrix: &'m DistanceMatrix, target_count: usize) -> Self {
        Self::with_config(matrix, SelectorConfig::new().with_target_count(target_count))
    }

    pub fn with_config(matrix: &'m DistanceMatrix, config: SelectorConfig) -> Self {
        Self {
            selector: GreedySelector::new(matrix, config),
        }
    }

    /// Run until the stop criterion fires. Objects already taken with
    /// [`next_object`](Self::next_object) count toward the target.
    pub fn select(&mut self) -> Result<Vec<usize>> {
        self.selector.select_all()
    }

    /// [`select`](Self::select) with observer callbacks.
    pub fn select_observed<O>(&mut self, observer: &mut O) -> Result<Vec<usize>>
    where
        O: SelectionObserver + ?Sized,
    {
        self.selector.select_all_observed(observer)
    }

    /// Take the next object, ignoring the stop criterion.
    pub fn next_object(&mut self) -> Result<usize> {
        self.selector.select_next()
    }

    /// Objects selected so far, in order
    pub fn selected(&self) -> &[usize] {
        self.selector.selected()
    }

    pub fn info(&self) -> &InformationVector {
        self.selector.info()
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.selector.stop_reason()
    }

    /// Start over with nothing selected.
    pub fn reset(&mut self) {
        self.selector.reset();
    }

    pub fn into_selection(self) -> Vec<usize> {
        self.selector.into_selection()
    }
}

impl Iterator for KennardStone<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.selector.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.selector.size_hint()
    }
}
