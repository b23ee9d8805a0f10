//! Classic Kennard–Stone maximin design
//!
//! Kennard and Stone, "Computer Aided Design of Experiments",
//! Technometrics 11 (1969).
//!
//! The first object is the one nearest the centre of the data, the second
//! the one farthest from it, and every further object the one whose distance
//! to its nearest already-selected neighbor is largest. Ties go to the lowest
//! index.

use serde::Serialize;

use crate::errors::{ErrorCode, Result, SelectionError};
use crate::matrix::DistanceMatrix;
use crate::metric::{check_points, pairwise_distances, Metric};

/// Selected objects and the rest, e.g. a calibration/validation split
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSplit {
    /// Selected objects, in selection order
    pub model: Vec<usize>,
    /// Objects not selected, ascending
    pub test: Vec<usize>,
}

/// Maximin selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxMin {
    target_count: usize,
    metric: Metric,
}

impl MaxMin {
    /// Select `target_count` objects with euclidean distances.
    pub fn new(target_count: usize) -> Self {
        Self {
            target_count,
            metric: Metric::Euclidean,
        }
    }

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

    fn check_target(&self, n: usize) -> Result<()> {
        if self.target_count == 0 || self.target_count >= n {
            return Err(SelectionError::config(
                ErrorCode::InvalidTargetCount,
                "/target_count",
                format!(
                    "maximin needs 0 < target_count < {n}, got {}",
                    self.target_count
                ),
            ));
        }
        Ok(())
    }

    /// Select from feature rows, seeding with the row nearest the feature mean.
    pub fn select<R>(&self, points: &[R]) -> Result<Vec<usize>>
    where
        R: AsRef<[f64]> + Sync,
    {
        self.metric.check()?;
        let dim = check_points(points)?;
        self.check_target(points.len())?;

        let mut centre = vec![0.0; dim];
        for row in points {
            for (c, x) in centre.iter_mut().zip(row.as_ref()) {
                *c += x;
            }
        }
        let n = points.len() as f64;
        centre.iter_mut().for_each(|c| *c /= n);

        let to_centre: Vec<f64> = points
            .iter()
            .map(|row| self.metric.distance(row.as_ref(), &centre))
            .collect();
        let seed = argmin(&to_centre);

        let matrix = pairwise_distances(points, self.metric)?;
        Ok(self.grow(&matrix, seed))
    }

    /// Select from a precomputed matrix, seeding with the object whose row
    /// sum is smallest.
    pub fn select_matrix(&self, matrix: &DistanceMatrix) -> Result<Vec<usize>> {
        self.check_target(matrix.len())?;
        let sums: Vec<f64> = matrix.rows().map(|row| row.iter().sum()).collect();
        Ok(self.grow(matrix, argmin(&sums)))
    }

    /// [`select`](Self::select) plus the complementary set.
    pub fn split<R>(&self, points: &[R]) -> Result<DatasetSplit>
    where
        R: AsRef<[f64]> + Sync,
    {
        let model = self.select(points)?;
        Ok(complement(model, points.len()))
    }

    fn grow(&self, matrix: &DistanceMatrix, seed: usize) -> Vec<usize> {
        let n = matrix.len();
        trace_stage!("maximin");

        let mut model = Vec::with_capacity(self.target_count);
        let mut taken = vec![false; n];
        // distance from each object to its nearest selected object
        let mut nearest = vec![f64::INFINITY; n];

        let mut next = seed;
        while model.len() < self.target_count {
            model.push(next);
            taken[next] = true;
            for (j, d) in matrix.row(next).iter().enumerate() {
                if *d < nearest[j] {
                    nearest[j] = *d;
                }
            }

            let mut best: Option<(usize, f64)> = None;
            for j in (0..n).filter(|&j| !taken[j]) {
                match best {
                    Some((_, score)) if nearest[j] <= score => {}
                    _ => best = Some((j, nearest[j])),
                }
            }
            match best {
                Some((j, _)) => next = j,
                None => break,
            }
        }

        trace_event!(debug, selected = model.len(), objects = n, "maximin selection done");
        model
    }
}

fn argmin(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v < values[best] {
            best = i;
        }
    }
    best
}

fn complement(model: Vec<usize>, n: usize) -> DatasetSplit {
    let mut taken = vec![false; n];
    for &i in &model {
        taken[i] = true;
    }
    let test = (0..n).filter(|&i| !taken[i]).collect();
    DatasetSplit { model, test }
}
