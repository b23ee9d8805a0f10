//! Greedy selector: the pick-max / decay loop
//!
//! A [`GreedySelector`] borrows a validated [`DistanceMatrix`] and owns the
//! information vector and the growing selection for one run. It can be
//! driven one object at a time ([`GreedySelector::select_next`], or as an
//! [`Iterator`]) or in batch until its [`StopCriterion`] fires
//! ([`GreedySelector::select_all`]).
//!
//! [`StopCriterion`]: super::stop::StopCriterion

use serde::Serialize;

use super::observer::{NoopObserver, SelectionObserver, StepClock, StepReport};
use super::{ContributionRemover, InfoVectorBuilder, InformationVector, AUTOSTOP_THRESHOLD};
use crate::errors::{Result, SelectionError};
use crate::matrix::DistanceMatrix;
use crate::types::{SelectionSummary, SelectorConfig, StopReason};

/// Lifecycle of a selection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorState {
    /// Information vector built, nothing selected yet
    Ready,
    /// At least one object selected
    Selecting,
    /// The batch loop stopped for the given reason
    Done(StopReason),
}

/// Greedy rank-based selector over one distance matrix
#[derive(Debug, Clone)]
pub struct GreedySelector<'m> {
    matrix: &'m DistanceMatrix,
    config: SelectorConfig,
    info: InformationVector,
    remover: ContributionRemover,
    selected: Vec<usize>,
    taken: Vec<bool>,
    scores_at_pick: Vec<f64>,
    state: SelectorState,
}

impl<'m> GreedySelector<'m> {
    /// Build the information vector and get ready to select.
    ///
    /// A `FixedCount(0)` criterion runs as autostop.
    pub fn new(matrix: &'m DistanceMatrix, mut config: SelectorConfig) -> Self {
        config.stop = config.stop.normalized();
        let n = matrix.len();
        let info = InfoVectorBuilder::new().build(matrix);
        trace_event!(debug, objects = n, total = info.total(), "built information vector");

        Self {
            matrix,
            config,
            info,
            remover: ContributionRemover::new(n),
            selected: Vec::with_capacity(n),
            taken: vec![false; n],
            scores_at_pick: Vec::with_capacity(n),
            state: SelectorState::Ready,
        }
    }

    /// Shorthand for a selector with a target count (`0` = autostop).
    pub fn with_target_count(matrix: &'m DistanceMatrix, target_count: usize) -> Self {
        Self::new(matrix, SelectorConfig::new().with_target_count(target_count))
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn matrix(&self) -> &'m DistanceMatrix {
        self.matrix
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    /// Selected indices so far, in selection order
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Current information vector
    pub fn info(&self) -> &InformationVector {
        &self.info
    }

    /// Reason the last batch run stopped, if it has
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            SelectorState::Done(reason) => Some(reason),
            _ => None,
        }
    }

    /// Objects not yet selected
    pub fn remaining(&self) -> usize {
        self.matrix.len() - self.selected.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Discard the current run and start over from a freshly built vector.
    pub fn reset(&mut self) {
        self.info = InfoVectorBuilder::new().build(self.matrix);
        self.selected.clear();
        self.taken.fill(false);
        self.scores_at_pick.clear();
        self.state = SelectorState::Ready;
    }

    /// Pick the next most informative object.
    ///
    /// Valid in any state until every object is selected; calling it after a
    /// finished batch run resumes selection past the stop point.
    pub fn select_next(&mut self) -> Result<usize> {
        self.select_next_observed(&mut NoopObserver)
    }

    /// [`select_next`](Self::select_next) with observer callbacks.
    pub fn select_next_observed<O>(&mut self, observer: &mut O) -> Result<usize>
    where
        O: SelectionObserver + ?Sized,
    {
        let total = self.matrix.len();
        if self.selected.len() >= total {
            return Err(SelectionError::ExhaustedSelection { total });
        }
        if self.selected.is_empty() {
            observer.on_info_vector(&self.info);
        }

        let clock = StepClock::start();
        let (index, score) = self
            .info
            .argmax_excluding(&self.taken)
            .ok_or(SelectionError::ExhaustedSelection { total })?;

        self.selected.push(index);
        self.taken[index] = true;
        self.scores_at_pick.push(score);
        self.remover.remove(self.matrix, &mut self.info, index)?;
        self.state = SelectorState::Selecting;

        let report = StepReport {
            step: self.selected.len(),
            index,
            score,
            below_threshold: self.info.count_below(AUTOSTOP_THRESHOLD),
            elapsed: clock.elapsed(),
        };
        trace_event!(
            debug,
            step = report.step,
            index,
            score,
            below_threshold = report.below_threshold,
            "selected object"
        );
        observer.on_pick(&report, &self.info);

        Ok(index)
    }

    /// Select until the stop criterion fires and return the full selection.
    ///
    /// Calling it again on a finished run returns the same selection.
    pub fn select_all(&mut self) -> Result<Vec<usize>> {
        self.select_all_observed(&mut NoopObserver)
    }

    /// [`select_all`](Self::select_all) with observer callbacks.
    pub fn select_all_observed<O>(&mut self, observer: &mut O) -> Result<Vec<usize>>
    where
        O: SelectionObserver + ?Sized,
    {
        self.drive(observer)?;
        Ok(self.selected.clone())
    }

    /// Run to completion and return the selection with its scores.
    pub fn run<O>(mut self, observer: &mut O) -> Result<SelectionSummary>
    where
        O: SelectionObserver + ?Sized,
    {
        let stop_reason = self.drive(observer)?;
        Ok(SelectionSummary {
            indices: self.selected,
            scores_at_pick: self.scores_at_pick,
            stop_reason,
            remaining_info: self.info.into_vec(),
        })
    }

    /// Consume the selector, keeping only the selection.
    pub fn into_selection(self) -> Vec<usize> {
        self.selected
    }

    fn drive<O>(&mut self, observer: &mut O) -> Result<StopReason>
    where
        O: SelectionObserver + ?Sized,
    {
        if let SelectorState::Done(reason) = self.state {
            return Ok(reason);
        }
        trace_stage!("select_all");

        // The criterion is only consulted after a decay step.
        let reason = loop {
            if !self.selected.is_empty() {
                if let Some(reason) = self.config.stop.evaluate(&self.info, self.selected.len()) {
                    break reason;
                }
            }
            self.select_next_observed(observer)?;
        };

        self.state = SelectorState::Done(reason);
        trace_event!(
            info,
            reason = reason.as_str(),
            selected = self.selected.len(),
            objects = self.matrix.len(),
            "selection stopped"
        );
        observer.on_stop(reason, &self.selected);
        Ok(reason)
    }
}

/// Yields objects in selection order until every object has been selected.
/// The stop criterion is not consulted.
impl Iterator for GreedySelector<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.select_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::observer::StepRecorder;
    use crate::engine::stop::StopCriterion;
    use crate::errors::ErrorCode;

    const EPS: f64 = 1e-12;

    fn pair() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap()
    }

    fn cluster_with_outlier() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            [0.0, 0.1, 0.1, 10.0],
            [0.1, 0.0, 0.1, 10.0],
            [0.1, 0.1, 0.0, 10.0],
            [10.0, 10.0, 10.0, 0.0],
        ])
        .unwrap()
    }

    fn equidistant(n: usize) -> DistanceMatrix {
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
            .collect();
        DistanceMatrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_pair_selects_both_in_index_order() {
        let m = pair();
        let mut sel = GreedySelector::with_target_count(&m, 2);
        assert_eq!(sel.select_all().unwrap(), vec![0, 1]);
        assert_eq!(sel.stop_reason(), Some(StopReason::TargetReached));
    }

    #[test]
    fn test_cluster_outlier_is_picked() {
        let m = cluster_with_outlier();
        let mut sel = GreedySelector::with_target_count(&m, 2);
        let picked = sel.select_all().unwrap();
        assert_eq!(picked, vec![0, 3]);
    }

    #[test]
    fn test_cluster_full_order() {
        let m = cluster_with_outlier();
        let mut sel = GreedySelector::with_target_count(&m, 4);
        assert_eq!(sel.select_all().unwrap(), vec![0, 3, 2, 1]);
    }

    #[test]
    fn test_target_beyond_n_selects_everything() {
        let m = cluster_with_outlier();
        let mut sel = GreedySelector::with_target_count(&m, 10);
        let picked = sel.select_all().unwrap();
        assert_eq!(picked.len(), 4);
        assert_eq!(sel.stop_reason(), Some(StopReason::Exhausted));
    }

    #[test]
    fn test_autostop_on_equidistant_set() {
        let m = equidistant(5);
        let mut sel = GreedySelector::new(&m, SelectorConfig::new().autostop());
        let picked = sel.select_all().unwrap();
        assert_eq!(picked, vec![0, 3]);
        assert_eq!(sel.stop_reason(), Some(StopReason::Autostop));
    }

    #[test]
    fn test_autostop_on_pair_selects_one() {
        let m = pair();
        let mut sel = GreedySelector::new(&m, SelectorConfig::default());
        assert_eq!(sel.select_all().unwrap(), vec![0]);
    }

    #[test]
    fn test_zero_fixed_count_runs_as_autostop() {
        let m = equidistant(3);
        let config: SelectorConfig =
            serde_json::from_str(r#"{"stop":{"fixed_count":0}}"#).unwrap();
        assert_eq!(config.stop, StopCriterion::Autostop);

        let direct = SelectorConfig::new().with_stop(StopCriterion::FixedCount(0));
        for config in [config, direct] {
            let mut sel = GreedySelector::new(&m, config);
            assert_eq!(sel.config().stop, StopCriterion::Autostop);
            // [2, 11/6, 5/3] decays to [0, 11/12, 10/9]: two below one
            assert_eq!(sel.select_all().unwrap(), vec![0]);
            assert_eq!(sel.stop_reason(), Some(StopReason::Autostop));
        }
    }

    #[test]
    fn test_select_next_after_exhaustion_errors() {
        let m = pair();
        let mut sel = GreedySelector::with_target_count(&m, 0);
        sel.select_next().unwrap();
        sel.select_next().unwrap();
        let err = sel.select_next().unwrap_err();
        assert_eq!(err, SelectionError::ExhaustedSelection { total: 2 });
        assert_eq!(err.code(), ErrorCode::Exhausted);
        // the partial result stays readable
        assert_eq!(sel.selected(), &[0, 1]);
    }

    #[test]
    fn test_incremental_matches_batch() {
        let m = cluster_with_outlier();
        for k in 1..=4 {
            let mut inc = GreedySelector::with_target_count(&m, 0);
            let stepped: Vec<usize> = (0..k).map(|_| inc.select_next().unwrap()).collect();

            let mut batch = GreedySelector::with_target_count(&m, k);
            assert_eq!(batch.select_all().unwrap(), stepped, "k = {k}");
        }
    }

    #[test]
    fn test_state_transitions() {
        let m = cluster_with_outlier();
        let mut sel = GreedySelector::with_target_count(&m, 2);
        assert_eq!(sel.state(), SelectorState::Ready);
        sel.select_next().unwrap();
        assert_eq!(sel.state(), SelectorState::Selecting);
        sel.select_all().unwrap();
        assert_eq!(sel.state(), SelectorState::Done(StopReason::TargetReached));
    }

    #[test]
    fn test_select_all_is_idempotent_once_done() {
        let m = cluster_with_outlier();
        let mut sel = GreedySelector::with_target_count(&m, 2);
        let first = sel.select_all().unwrap();
        let second = sel.select_all().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_select_next_resumes_after_done() {
        let m = cluster_with_outlier();
        let mut sel = GreedySelector::with_target_count(&m, 2);
        sel.select_all().unwrap();
        assert_eq!(sel.select_next().unwrap(), 2);
        assert_eq!(sel.state(), SelectorState::Selecting);
        assert_eq!(sel.selected(), &[0, 3, 2]);
    }

    #[test]
    fn test_selected_object_score_is_zero() {
        let m = cluster_with_outlier();
        let mut sel = GreedySelector::with_target_count(&m, 0);
        let first = sel.select_next().unwrap();
        assert_eq!(sel.info().score(first), 0.0);
    }

    #[test]
    fn test_iterator_yields_every_object_once() {
        let m = equidistant(6);
        let sel = GreedySelector::with_target_count(&m, 2);
        assert_eq!(sel.size_hint(), (6, Some(6)));
        let mut all: Vec<usize> = sel.collect();
        assert_eq!(all.len(), 6);
        all.sort_unstable();
        assert_eq!(all, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_reset_reproduces_run() {
        let m = cluster_with_outlier();
        let mut sel = GreedySelector::with_target_count(&m, 3);
        let first = sel.select_all().unwrap();
        sel.reset();
        assert_eq!(sel.state(), SelectorState::Ready);
        assert!(sel.selected().is_empty());
        assert_eq!(sel.select_all().unwrap(), first);
    }

    #[test]
    fn test_run_summary() {
        let m = cluster_with_outlier();
        let sel = GreedySelector::with_target_count(&m, 2);
        let summary = sel.run(&mut NoopObserver).unwrap();
        assert_eq!(summary.indices, vec![0, 3]);
        assert_eq!(summary.stop_reason, StopReason::TargetReached);
        assert!((summary.scores_at_pick[0] - 2.5).abs() < EPS);
        assert!((summary.scores_at_pick[1] - 1.3125).abs() < EPS);
        assert_eq!(summary.remaining_info[0], 0.0);
        assert_eq!(summary.remaining_info[3], 0.0);
    }

    #[test]
    fn test_observer_sees_every_step() {
        let m = equidistant(5);
        let sel = GreedySelector::new(&m, SelectorConfig::new().with_stop(StopCriterion::Autostop));
        let mut rec = StepRecorder::new();
        let summary = sel.run(&mut rec).unwrap();

        assert_eq!(rec.steps().len(), summary.len());
        assert_eq!(rec.stop_reason(), Some(StopReason::Autostop));
        assert_eq!(rec.steps()[0].step, 1);
        assert_eq!(rec.steps()[1].index, 3);
        assert_eq!(rec.steps()[1].below_threshold, 3);
        assert!(rec.initial_total().is_some());
    }

    #[test]
    fn test_observer_as_trait_object() {
        let m = pair();
        let mut sel = GreedySelector::with_target_count(&m, 2);
        let mut rec = StepRecorder::new();
        let obs: &mut dyn SelectionObserver = &mut rec;
        sel.select_all_observed(obs).unwrap();
        assert_eq!(rec.steps().len(), 2);
    }
}
