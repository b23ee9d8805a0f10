//! Information vector construction
//!
//! Every object in turn acts as a reference: its row is ranked from closest
//! to farthest, the reference itself gets [`SELF_INFORMATION`], and the k-th
//! closest other object gets `1 / (k + 1)`. Objects sitting in dense, central
//! regions are close to many references and accumulate the highest scores.

use super::rank::RankTable;
use super::{InformationVector, FIRST_RANK_DIVISOR, SELF_INFORMATION};
use crate::matrix::DistanceMatrix;

/// Builds the initial [`InformationVector`] from a distance matrix
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoVectorBuilder;

impl InfoVectorBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Accumulate rank-reciprocal credit over all N reference rows.
    ///
    /// O(N² log N) time; the rank table is reused across rows.
    pub fn build(&self, matrix: &DistanceMatrix) -> InformationVector {
        let n = matrix.len();
        let mut info = InformationVector::zeros(n);
        let mut table = RankTable::with_capacity(n);
        let scores = info.as_mut_slice();

        for reference in 0..n {
            let mut div = FIRST_RANK_DIVISOR;
            for &(_, object) in table.rank_row(matrix.row(reference)) {
                if object == reference {
                    scores[object] += SELF_INFORMATION;
                } else {
                    scores[object] += 1.0 / div;
                    div += 1.0;
                }
            }
        }

        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn harmonic(n: usize) -> f64 {
        (1..=n).map(|k| 1.0 / k as f64).sum()
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

    #[test]
    fn test_two_objects_tie() {
        let m = DistanceMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
        let info = InfoVectorBuilder::new().build(&m);
        assert_eq!(info.as_slice(), &[1.5, 1.5]);
    }

    #[test]
    fn test_cluster_scores() {
        let info = InfoVectorBuilder::new().build(&cluster_with_outlier());
        let expected = [2.5, 13.0 / 6.0, 23.0 / 12.0, 1.75];
        for (got, want) in info.as_slice().iter().zip(expected) {
            assert!((got - want).abs() < EPS, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_equidistant_ties_follow_index_order() {
        let m = DistanceMatrix::from_rows(&[[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]])
            .unwrap();
        let info = InfoVectorBuilder::new().build(&m);
        let expected = [2.0, 1.0 + 0.5 + 1.0 / 3.0, 1.0 + 1.0 / 3.0 + 1.0 / 3.0];
        for (got, want) in info.as_slice().iter().zip(expected) {
            assert!((got - want).abs() < EPS);
        }
    }

    #[test]
    fn test_total_is_n_times_harmonic() {
        // Each row hands out 1 + 1/2 + ... + 1/N regardless of geometry.
        let m = cluster_with_outlier();
        let info = InfoVectorBuilder::new().build(&m);
        assert!((info.total() - 4.0 * harmonic(4)).abs() < EPS);
    }

    #[test]
    fn test_every_object_gets_self_information() {
        let m = cluster_with_outlier();
        let info = InfoVectorBuilder::new().build(&m);
        assert!(info.as_slice().iter().all(|&s| s >= SELF_INFORMATION));
    }

    #[test]
    fn test_self_entry_found_by_index_not_distance() {
        // object 1 has a zero distance to object 0 as well as to itself
        let m = DistanceMatrix::from_rows(&[[0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [1.0, 1.0, 0.0]])
            .unwrap();
        let info = InfoVectorBuilder::new().build(&m);
        // row0: 0 self, 1 -> 1/2, 2 -> 1/3
        // row1: 0 -> 1/2, 1 self, 2 -> 1/3
        // row2: 2 self, 0 -> 1/2, 1 -> 1/3
        let expected = [1.0 + 0.5 + 0.5, 0.5 + 1.0 + 1.0 / 3.0, 1.0 / 3.0 + 1.0 / 3.0 + 1.0];
        for (got, want) in info.as_slice().iter().zip(expected) {
            assert!((got - want).abs() < EPS);
        }
    }
}
