//! Contribution removal
//!
//! After an object is selected, every other object is multiplied by
//! `1 - 1/div` where `div` starts at [`FIRST_RANK_DIVISOR`] for the nearest
//! neighbor of the pick and grows by one per rank. Near neighbors become
//! redundant and lose most of their score; far objects keep nearly all of it.
//! The pick itself is multiplied by zero.

use super::rank::RankTable;
use super::{InformationVector, FIRST_RANK_DIVISOR};
use crate::errors::Result;
use crate::matrix::DistanceMatrix;

/// Decays an [`InformationVector`] around a selected object.
///
/// Holds its rank table and factor buffer so repeated calls do not allocate.
#[derive(Debug, Clone, Default)]
pub struct ContributionRemover {
    table: RankTable,
    factors: Vec<f64>,
}

impl ContributionRemover {
    /// Create a remover sized for `n` objects
    pub fn new(n: usize) -> Self {
        Self {
            table: RankTable::with_capacity(n),
            factors: Vec::with_capacity(n),
        }
    }

    /// Multiplicative decay factor for every object, given the pick.
    pub fn decay_factors(&mut self, matrix: &DistanceMatrix, selected: usize) -> Result<&[f64]> {
        matrix.check_index(selected)?;

        self.factors.clear();
        self.factors.resize(matrix.len(), 0.0);

        let mut div = FIRST_RANK_DIVISOR;
        for &(_, object) in self.table.rank_row(matrix.row(selected)) {
            if object == selected {
                self.factors[object] = 0.0;
            } else {
                self.factors[object] = 1.0 - 1.0 / div;
                div += 1.0;
            }
        }

        Ok(&self.factors)
    }

    /// Apply the decay for `selected` to `info` in place.
    pub fn remove(
        &mut self,
        matrix: &DistanceMatrix,
        info: &mut InformationVector,
        selected: usize,
    ) -> Result<()> {
        let factors = self.decay_factors(matrix, selected)?;
        info.scale_by(factors);
        Ok(())
    }
}
