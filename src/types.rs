//! Shared configuration and result types.

use serde::{Deserialize, Serialize};

use crate::engine::stop::StopCriterion;

/// Configuration for a greedy selection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// When the batch loop stops (default: autostop)
    #[serde(default)]
    pub stop: StopCriterion,
}

impl SelectorConfig {
    /// Create a config with the default autostop criterion
    pub fn new() -> Self {
        Self::default()
    }

    /// Select exactly `target_count` objects; `0` means autostop.
    pub fn with_target_count(mut self, target_count: usize) -> Self {
        self.stop = StopCriterion::from_target_count(target_count);
        self
    }

    /// Use the autostop rule
    pub fn autostop(mut self) -> Self {
        self.stop = StopCriterion::Autostop;
        self
    }

    /// Set the stop criterion directly
    pub fn with_stop(mut self, stop: StopCriterion) -> Self {
        self.stop = stop;
        self
    }
}

/// Why a batch selection finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The fixed target count was reached
    TargetReached,
    /// More scores fell below the autostop threshold than objects selected
    Autostop,
    /// Every object has been selected
    Exhausted,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TargetReached => "target_reached",
            Self::Autostop => "autostop",
            Self::Exhausted => "exhausted",
        }
    }
}

/// Full outcome of a selection run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSummary {
    /// Selected object indices, in selection order
    pub indices: Vec<usize>,
    /// Information score each object had at the moment it was picked
    pub scores_at_pick: Vec<f64>,
    /// Why the run stopped
    pub stop_reason: StopReason,
    /// Information vector after the last decay step
    pub remaining_info: Vec<f64>,
}

impl SelectionSummary {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
