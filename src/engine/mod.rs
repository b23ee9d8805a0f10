//! Greedy rank-based selection engine
//!
//! Shared by the Most Descriptive Compound and rank-based Kennard–Stone
//! strategies:
//!
//! 1. [`InfoVectorBuilder`] turns the distance matrix into one information
//!    score per object using rank-reciprocal weighting.
//! 2. [`GreedySelector`] repeatedly picks the highest score, records it and
//!    asks the [`ContributionRemover`] to decay every score by its
//!    closeness-rank to the pick.
//! 3. A [`StopCriterion`] ends the batch loop.

pub mod contribution;
pub mod greedy;
pub mod info_vector;
pub mod observer;
mod rank;
pub mod stop;

pub use contribution::ContributionRemover;
pub use greedy::{GreedySelector, SelectorState};
pub use info_vector::InfoVectorBuilder;
pub use observer::{NoopObserver, SelectionObserver, StepRecorder, StepReport};
pub use stop::StopCriterion;

use serde::Serialize;

/// Credit an object receives from its own row.
pub const SELF_INFORMATION: f64 = 1.0;

/// Denominator applied to the nearest non-self neighbor; each further rank
/// adds one.
pub const FIRST_RANK_DIVISOR: f64 = 2.0;

/// Scores strictly below this count as informationally exhausted.
pub const AUTOSTOP_THRESHOLD: f64 = 1.0;

/// Per-object information scores, indexed like the distance matrix
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InformationVector {
    scores: Vec<f64>,
}

impl InformationVector {
    /// A vector of `n` zeros
    pub fn zeros(n: usize) -> Self {
        Self {
            scores: vec![0.0; n],
        }
    }

    /// Wrap existing scores
    pub fn from_scores(scores: Vec<f64>) -> Self {
        Self { scores }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score of object `index`, `0.0` if out of range
    pub fn score(&self, index: usize) -> f64 {
        self.scores.get(index).copied().unwrap_or(0.0)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.scores
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.scores
    }

    /// Sum of all scores
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }

    /// Number of scores strictly below `threshold`
    pub fn count_below(&self, threshold: f64) -> usize {
        self.scores.iter().filter(|&&s| s < threshold).count()
    }

    /// Highest score among objects not yet `taken`.
    ///
    /// Scans in index order and only replaces the running best on a strictly
    /// greater score, so ties go to the lowest index.
    pub fn argmax_excluding(&self, taken: &[bool]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &score) in self.scores.iter().enumerate() {
            if taken.get(i).copied().unwrap_or(false) {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.scores
    }

    /// Element-wise multiply by `factors`
    pub(crate) fn scale_by(&mut self, factors: &[f64]) {
        for (score, factor) in self.scores.iter_mut().zip(factors) {
            *score *= factor;
        }
    }
}
