//! Most Descriptive Compound selection
//!
//! Hudson, Hyde, Rahr and Wood, "Parameter Based Methods for Compound
//! Selection from Chemical Databases", Quant. Struct.-Act. Relat. 15 (1996).
//!
//! Accepts raw feature rows (distances computed with the configured metric)
//! or a precomputed matrix, and runs the greedy information engine.

use crate::engine::{GreedySelector, NoopObserver, SelectionObserver};
use crate::errors::Result;
use crate::matrix::DistanceMatrix;
use crate::metric::{pairwise_distances, Metric};
use crate::types::{SelectionSummary, SelectorConfig};

/// Most Descriptive Compound selector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MostDescriptive {
    /// Objects to select; `0` means autostop
    target_count: usize,
    /// Metric used when selecting from raw feature rows
    metric: Metric,
}

impl MostDescriptive {
    /// Autostop, euclidean distances
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of objects to select (`0` = autostop)
    pub fn with_target_count(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }

    /// Set the metric for raw feature rows
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    fn selector_config(&self) -> SelectorConfig {
        SelectorConfig::new().with_target_count(self.target_count)
    }

    /// Select from feature rows, one row per object.
    pub fn select<R>(&self, points: &[R]) -> Result<Vec<usize>>
    where
        R: AsRef<[f64]> + Sync,
    {
        let matrix = pairwise_distances(points, self.metric)?;
        self.select_matrix(&matrix)
    }

    /// Select from a precomputed distance matrix.
    pub fn select_matrix(&self, matrix: &DistanceMatrix) -> Result<Vec<usize>> {
        GreedySelector::new(matrix, self.selector_config()).select_all()
    }

    /// Select from a precomputed matrix and return scores and stop reason.
    pub fn summarize(&self, matrix: &DistanceMatrix) -> Result<SelectionSummary> {
        self.summarize_observed(matrix, &mut NoopObserver)
    }

    /// [`summarize`](Self::summarize) with observer callbacks.
    pub fn summarize_observed<O>(
        &self,
        matrix: &DistanceMatrix,
        observer: &mut O,
    ) -> Result<SelectionSummary>
    where
        O: SelectionObserver + ?Sized,
    {
        GreedySelector::new(matrix, self.selector_config()).run(observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StepRecorder;
    use crate::errors::ErrorCode;
    use crate::types::StopReason;

    fn grid(side: usize) -> Vec<[f64; 2]> {
        let mut points = Vec::with_capacity(side * side);
        for x in 0..side {
            for y in 0..side {
                points.push([x as f64, y as f64]);
            }
        }
        points
    }

    #[test]
    fn test_select_from_points() {
        // three coincident points and one far away
        let points = [[1.0], [1.0], [1.0], [11.0]];
        let picked = MostDescriptive::new()
            .with_target_count(2)
            .select(&points)
            .unwrap();
        assert_eq!(picked, vec![0, 3]);
    }

    #[test]
    fn test_first_pick_is_central() {
        // centre of a 3x3 grid is closest to everything
        let picked = MostDescriptive::new()
            .with_target_count(1)
            .select(&grid(3))
            .unwrap();
        assert_eq!(picked, vec![4]);
    }

    #[test]
    fn test_autostop_selects_subset() {
        let picked = MostDescriptive::new().select(&grid(5)).unwrap();
        assert!(!picked.is_empty());
        assert!(picked.len() < 25);
    }

    #[test]
    fn test_metric_changes_selection_order() {
        let points = [[0.0, 0.0], [1.0, 1.0], [2.0, 0.0], [5.0, 5.0]];
        let euclid = MostDescriptive::new().with_target_count(4).select(&points).unwrap();
        let cheb = MostDescriptive::new()
            .with_target_count(4)
            .with_metric(Metric::Chebyshev)
            .select(&points)
            .unwrap();
        // the second pick depends on the metric
        assert_eq!(euclid, vec![1, 2, 3, 0]);
        assert_eq!(cheb, vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_bad_points_rejected() {
        let points = [[1.0, 2.0]];
        let err = MostDescriptive::new().select(&points).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TooSmall);
    }

    #[test]
    fn test_summarize_with_recorder() {
        let m = DistanceMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
        let mut rec = StepRecorder::new();
        let summary = MostDescriptive::new()
            .with_target_count(2)
            .summarize_observed(&m, &mut rec)
            .unwrap();
        assert_eq!(summary.indices, vec![0, 1]);
        assert_eq!(summary.stop_reason, StopReason::TargetReached);
        assert_eq!(rec.steps().len(), 2);
    }
}
