//! Stop criteria for the batch selection loop.

use serde::{Deserialize, Serialize};

use super::{InformationVector, AUTOSTOP_THRESHOLD};
use crate::types::StopReason;

/// When [`GreedySelector::select_all`](super::greedy::GreedySelector::select_all) stops.
///
/// Both policies also stop unconditionally once every object is selected.
/// A count of zero means autostop, whether built with
/// [`from_target_count`](Self::from_target_count) or deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "StopCriterionRepr")]
pub enum StopCriterion {
    /// Stop once this many objects are selected. Values `>= N` select all N.
    FixedCount(usize),
    /// Stop once more scores are below 1.0 than objects have been selected.
    #[default]
    Autostop,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum StopCriterionRepr {
    FixedCount(usize),
    Autostop,
}

impl From<StopCriterionRepr> for StopCriterion {
    fn from(repr: StopCriterionRepr) -> Self {
        match repr {
            StopCriterionRepr::FixedCount(k) => Self::from_target_count(k),
            StopCriterionRepr::Autostop => Self::Autostop,
        }
    }
}

impl StopCriterion {
    /// Map a target count to a criterion: `0` is autostop.
    pub fn from_target_count(target_count: usize) -> Self {
        match target_count {
            0 => Self::Autostop,
            k => Self::FixedCount(k),
        }
    }

    /// `FixedCount(0)` becomes `Autostop`; anything else is unchanged.
    pub fn normalized(self) -> Self {
        Self::from_target_count(self.target_count())
    }

    /// The configured target count, `0` for autostop.
    pub fn target_count(&self) -> usize {
        match self {
            Self::FixedCount(k) => *k,
            Self::Autostop => 0,
        }
    }

    /// Decide whether to stop after `selected` objects have been picked and
    /// their contributions removed from `info`.
    ///
    /// Must only be called after at least one selection.
    pub fn evaluate(&self, info: &InformationVector, selected: usize) -> Option<StopReason> {
        match *self {
            Self::FixedCount(k) if selected >= k => return Some(StopReason::TargetReached),
            // more exhausted scores than picks
            Self::Autostop if info.count_below(AUTOSTOP_THRESHOLD) > selected => {
                return Some(StopReason::Autostop)
            }
            _ => {}
        }
        if selected >= info.len() {
            Some(StopReason::Exhausted)
        } else {
            None
        }
    }
}
