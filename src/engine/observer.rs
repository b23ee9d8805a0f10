//! Selection observer: hooks for logging, profiling, and debugging.
//!
//! Observers receive notifications at step boundaries without coupling to the
//! selection logic. All hooks default to no-ops, so an observer only
//! implements what it needs.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::InformationVector;
use crate::types::StopReason;

/// What happened in one `select_next` step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// 1-based step number
    pub step: usize,
    /// Object picked in this step
    pub index: usize,
    /// Its information score at the moment of the pick
    pub score: f64,
    /// Scores below the autostop threshold after the decay
    pub below_threshold: usize,
    /// Wall time spent in the step
    pub elapsed: Duration,
}

/// Receives callbacks as a selection run progresses
pub trait SelectionObserver {
    /// The information vector was built (or rebuilt by `reset`).
    fn on_info_vector(&mut self, _info: &InformationVector) {}

    /// An object was picked and its contribution removed.
    fn on_pick(&mut self, _report: &StepReport, _info: &InformationVector) {}

    /// The batch loop stopped.
    fn on_stop(&mut self, _reason: StopReason, _selected: &[usize]) {}
}

/// Observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SelectionObserver for NoopObserver {}

/// Records every step report and the stop reason
#[derive(Debug, Clone, Default)]
pub struct StepRecorder {
    initial_total: Option<f64>,
    steps: Vec<StepReport>,
    stop: Option<StopReason>,
}

impl StepRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[StepReport] {
        &self.steps
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }

    /// Sum of the information vector when it was built
    pub fn initial_total(&self) -> Option<f64> {
        self.initial_total
    }

    /// Total time spent in recorded steps
    pub fn total_elapsed(&self) -> Duration {
        self.steps.iter().map(|s| s.elapsed).sum()
    }
}

impl SelectionObserver for StepRecorder {
    fn on_info_vector(&mut self, info: &InformationVector) {
        self.initial_total = Some(info.total());
    }

    fn on_pick(&mut self, report: &StepReport, _info: &InformationVector) {
        self.steps.push(report.clone());
    }

    fn on_stop(&mut self, reason: StopReason, _selected: &[usize]) {
        self.stop = Some(reason);
    }
}

/// Monotonic timer for one step
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepClock(Instant);

impl StepClock {
    pub(crate) fn start() -> Self {
        Self(Instant::now())
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}
