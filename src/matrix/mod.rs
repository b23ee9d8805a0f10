//! Dense distance matrix
//!
//! A [`DistanceMatrix`] is an N×N, row-major matrix of pairwise
//! dissimilarities. It is validated once at construction (shape, finite,
//! non-negative, symmetric) and is immutable afterwards, so a selector can
//! borrow it for the whole run and several runs can share it across threads.

pub mod rules;

use crate::errors::{Diagnostic, ErrorCode, Result, SelectionError};
use crate::validation::{ValidationEngine, ValidationReport};

/// Minimum number of objects a selection can run on.
pub const MIN_OBJECTS: usize = 2;

/// Default relative tolerance used by the symmetry check.
pub const DEFAULT_SYMMETRY_TOLERANCE: f64 = 1e-9;

/// An immutable, validated N×N distance matrix
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Build from nested rows with the default symmetry tolerance.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        Self::from_rows_with_tolerance(rows, DEFAULT_SYMMETRY_TOLERANCE)
    }

    /// Build from nested rows, accepting `|d[i][j] - d[j][i]|` up to
    /// `tolerance * max(1, |d[i][j]|, |d[j][i]|)`.
    pub fn from_rows_with_tolerance<R: AsRef<[f64]>>(rows: &[R], tolerance: f64) -> Result<Self> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            let len = row.as_ref().len();
            if len != n {
                return Err(SelectionError::InvalidInput(
                    Diagnostic::new(
                        ErrorCode::NotSquare,
                        format!("/rows/{i}"),
                        format!("row {i} has {len} entries, expected {n}"),
                    )
                    .with_hint("A distance matrix must be square (N rows of N entries)"),
                ));
            }
        }

        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            data.extend_from_slice(row.as_ref());
        }
        Self::from_flat_with_tolerance(n, data, tolerance)
    }

    /// Build from a row-major buffer of `n * n` entries.
    pub fn from_flat(n: usize, data: Vec<f64>) -> Result<Self> {
        Self::from_flat_with_tolerance(n, data, DEFAULT_SYMMETRY_TOLERANCE)
    }

    /// Build from a row-major buffer with a custom symmetry tolerance.
    pub fn from_flat_with_tolerance(n: usize, data: Vec<f64>, tolerance: f64) -> Result<Self> {
        if n.checked_mul(n) != Some(data.len()) {
            return Err(SelectionError::input(
                ErrorCode::NotSquare,
                "/",
                format!("buffer of {} entries cannot hold a {n}x{n} matrix", data.len()),
            ));
        }
        if n < MIN_OBJECTS {
            return Err(SelectionError::InvalidInput(
                Diagnostic::new(
                    ErrorCode::TooSmall,
                    "/",
                    format!("selection needs at least {MIN_OBJECTS} objects, got {n}"),
                )
                .with_hint("Provide a matrix with two or more rows"),
            ));
        }

        let matrix = Self { n, data };
        matrix
            .validation_report(tolerance)
            .into_result(SelectionError::InvalidInput)?;
        Ok(matrix)
    }

    /// Run the content rules without constructing anything.
    pub fn validation_report(&self, tolerance: f64) -> ValidationReport {
        ValidationEngine::for_matrices(tolerance).validate(self)
    }

    /// Number of objects (N).
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always `false` for a validated matrix; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between objects `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Distances from object `i` to every object, in index order.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Iterate over rows in index order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.n)
    }

    /// The row-major backing buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<()> {
        if index < self.n {
            Ok(())
        } else {
            Err(SelectionError::input(
                ErrorCode::IndexOutOfRange,
                format!("/objects/{index}"),
                format!("object {index} is out of range for {} objects", self.n),
            ))
        }
    }
}
