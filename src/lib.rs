//! Representative subset selection by rank-based information scores.
//!
//! Given `N` objects and their pairwise distances, pick a small subset that
//! best describes the whole set. Two greedy strategies share one engine:
//!
//! - **Most Descriptive Compound** ([`MostDescriptive`]): every object earns
//!   information from every row of the distance matrix according to how
//!   close it ranks to that row's reference object. The highest scorer is
//!   picked, its neighborhood is discounted, and the loop repeats.
//! - **Kennard–Stone** ([`KennardStone`]): the same loop over a borrowed
//!   matrix, with incremental "give me the next object" access.
//!
//! The classic maximin Kennard–Stone design is available as [`MaxMin`].
//!
//! ```
//! use rapid_mdc::{DistanceMatrix, GreedySelector, SelectorConfig};
//!
//! let matrix = DistanceMatrix::from_rows(&[
//!     [0.0, 0.1, 0.1, 10.0],
//!     [0.1, 0.0, 0.1, 10.0],
//!     [0.1, 0.1, 0.0, 10.0],
//!     [10.0, 10.0, 10.0, 0.0],
//! ])?;
//! let mut selector = GreedySelector::new(&matrix, SelectorConfig::new().with_target_count(2));
//! assert_eq!(selector.select_all()?, vec![0, 3]);
//! # Ok::<(), rapid_mdc::SelectionError>(())
//! ```
//!
//! # Features
//!
//! - `tracing` (default): structured events and spans through the
//!   [`tracing`](https://docs.rs/tracing) crate.

// ---------------------------------------------------------------------------
// Conditional tracing support
// ---------------------------------------------------------------------------

/// Emit a tracing event at the given level (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::$level!($($arg)+);
    };
}

/// Enter a tracing span for a selection stage (when the `tracing` feature is
/// enabled).
macro_rules! trace_stage {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("selection_stage", stage = $name).entered();
    };
}

pub mod engine;
pub mod errors;
pub mod matrix;
pub mod metric;
pub mod spec;
pub mod strategies;
pub mod types;
pub mod validation;

pub use engine::{
    ContributionRemover, GreedySelector, InfoVectorBuilder, InformationVector, NoopObserver,
    SelectionObserver, SelectorState, StepRecorder, StepReport, StopCriterion,
};
pub use errors::{Diagnostic, ErrorCode, Result, SelectionError};
pub use matrix::DistanceMatrix;
pub use metric::{pairwise_distances, Metric};
pub use spec::{ResolvedSpec, SelectionSpec};
pub use strategies::maximin::DatasetSplit;
pub use strategies::{KennardStone, MaxMin, MostDescriptive, Strategy};
pub use types::{SelectionSummary, SelectorConfig, StopReason};

/// Most Descriptive Compound selection on a precomputed matrix.
///
/// `target_count == 0` selects with autostop.
pub fn select_most_descriptive(matrix: &DistanceMatrix, target_count: usize) -> Result<Vec<usize>> {
    MostDescriptive::new()
        .with_target_count(target_count)
        .select_matrix(matrix)
}

/// Validate `spec` and run the strategy it names on feature rows.
pub fn run_spec<R>(spec: &SelectionSpec, points: &[R]) -> Result<Vec<usize>>
where
    R: AsRef<[f64]> + Sync,
{
    spec.run(points)
}
