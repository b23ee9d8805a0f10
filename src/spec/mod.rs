//! Selection specification documents.
//!
//! A [`SelectionSpec`] names a strategy, a target count and a metric in a
//! small versioned JSON document. It is checked by the rules in [`rules`]
//! and then resolved into typed settings.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "strategy": "mdc",
//!   "target_count": 10,
//!   "metric": "minkowski",
//!   "metric_p": 3.0,
//!   "strict": false
//! }
//! ```
//!
//! `target_count: 0` (the default) asks for autostop.

pub mod rules;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Diagnostic, ErrorCode, Result, SelectionError};
use crate::matrix::DistanceMatrix;
use crate::metric::{pairwise_distances, Metric};
use crate::strategies::{KennardStone, MaxMin, MostDescriptive, Strategy};
use crate::validation::{ValidationEngine, ValidationReport};

/// Current spec version.
pub const SPEC_VERSION: u32 = 1;

fn default_version() -> u32 {
    SPEC_VERSION
}

fn default_strategy() -> String {
    Strategy::default().as_str().to_string()
}

fn default_metric() -> String {
    Metric::default().as_str().to_string()
}

/// Top-level selection specification (v1).
///
/// Strategy and metric stay as strings here so that a misspelling is
/// reported by the validator with a path and a hint instead of failing
/// deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSpec {
    /// Spec version (currently `1`).
    #[serde(default = "default_version")]
    pub v: u32,

    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Objects to select; `0` means autostop. Signed so that a negative
    /// value reaches validation.
    #[serde(default)]
    pub target_count: i64,

    #[serde(default = "default_metric")]
    pub metric: String,

    /// Minkowski exponent.
    #[serde(default)]
    pub metric_p: Option<f64>,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for SelectionSpec {
    fn default() -> Self {
        Self {
            v: SPEC_VERSION,
            strategy: default_strategy(),
            target_count: 0,
            metric: default_metric(),
            metric_p: None,
            strict: false,
            unknown_fields: HashMap::new(),
        }
    }
}

impl SelectionSpec {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: SelectionSpec = serde_json::from_str(json).map_err(|e| {
            SelectionError::InvalidConfiguration(
                Diagnostic::new(ErrorCode::MalformedSpec, "", format!("invalid selection spec: {e}"))
                    .with_hint("Expected an object like {\"v\": 1, \"strategy\": \"mdc\"}"),
            )
        })?;
        spec.validate().into_result(SelectionError::InvalidConfiguration)?;
        Ok(spec)
    }

    /// Run the default spec rules and return every finding.
    pub fn validate(&self) -> ValidationReport {
        ValidationEngine::<SelectionSpec>::with_defaults().validate(self)
    }

    /// Validate and convert into typed settings.
    pub fn resolve(&self) -> Result<ResolvedSpec> {
        self.validate().into_result(SelectionError::InvalidConfiguration)?;
        let strategy: Strategy = self.strategy.parse()?;
        let metric = Metric::parse_with_parameter(&self.metric, self.metric_p)?;
        let target_count = usize::try_from(self.target_count).map_err(|_| {
            SelectionError::config(
                ErrorCode::InvalidTargetCount,
                "/target_count",
                format!("target_count must not be negative, got {}", self.target_count),
            )
        })?;
        Ok(ResolvedSpec {
            strategy,
            target_count,
            metric,
        })
    }

    /// Resolve and select from feature rows.
    pub fn run<R>(&self, points: &[R]) -> Result<Vec<usize>>
    where
        R: AsRef<[f64]> + Sync,
    {
        self.resolve()?.run(points)
    }

    /// Resolve and select from a precomputed matrix. The metric is ignored.
    pub fn run_matrix(&self, matrix: &DistanceMatrix) -> Result<Vec<usize>> {
        self.resolve()?.run_matrix(matrix)
    }
}

/// A validated spec with typed settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedSpec {
    pub strategy: Strategy,
    pub target_count: usize,
    pub metric: Metric,
}

impl ResolvedSpec {
    pub fn run<R>(&self, points: &[R]) -> Result<Vec<usize>>
    where
        R: AsRef<[f64]> + Sync,
    {
        trace_stage!(self.strategy.as_str());
        match self.strategy {
            Strategy::MostDescriptive => MostDescriptive::new()
                .with_target_count(self.target_count)
                .with_metric(self.metric)
                .select(points),
            Strategy::KennardStone => {
                let matrix = pairwise_distances(points, self.metric)?;
                let mut selector = KennardStone::new(&matrix, self.target_count);
                selector.select()
            }
            Strategy::MaxMin => MaxMin::new(self.target_count)
                .with_metric(self.metric)
                .select(points),
        }
    }

    pub fn run_matrix(&self, matrix: &DistanceMatrix) -> Result<Vec<usize>> {
        trace_stage!(self.strategy.as_str());
        match self.strategy {
            Strategy::MostDescriptive => MostDescriptive::new()
                .with_target_count(self.target_count)
                .select_matrix(matrix),
            Strategy::KennardStone => {
                let mut selector = KennardStone::new(matrix, self.target_count);
                selector.select()
            }
            Strategy::MaxMin => MaxMin::new(self.target_count).select_matrix(matrix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_points() -> Vec<[f64; 1]> {
        vec![[1.0], [1.0], [1.0], [11.0]]
    }

    #[test]
    fn test_defaults_from_empty_object() {
        let spec = SelectionSpec::from_json("{}").unwrap();
        assert_eq!(spec, SelectionSpec::default());
        let resolved = spec.resolve().unwrap();
        assert_eq!(resolved.strategy, Strategy::MostDescriptive);
        assert_eq!(resolved.target_count, 0);
        assert_eq!(resolved.metric, Metric::Euclidean);
    }

    #[test]
    fn test_full_document() {
        let spec = SelectionSpec::from_json(
            r#"{"v": 1, "strategy": "ks", "target_count": 3,
                "metric": "minkowski", "metric_p": 3.0, "strict": true}"#,
        )
        .unwrap();
        let resolved = spec.resolve().unwrap();
        assert_eq!(resolved.strategy, Strategy::KennardStone);
        assert_eq!(resolved.target_count, 3);
        assert_eq!(resolved.metric, Metric::Minkowski { p: 3.0 });
    }

    #[test]
    fn test_malformed_json() {
        let err = SelectionSpec::from_json("{\"v\": ").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedSpec);
        let err = SelectionSpec::from_json(r#"{"target_count": "ten"}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedSpec);
    }

    #[test]
    fn test_negative_target_count() {
        let err = SelectionSpec::from_json(r#"{"target_count": -1}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidTargetCount);
        assert!(matches!(err, SelectionError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_unknown_metric_reports_path() {
        let err = SelectionSpec::from_json(r#"{"metric": "mahalanobis"}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownMetric);
        assert_eq!(err.diagnostic().unwrap().path, "/metric");
    }

    #[test]
    fn test_run_each_strategy_on_points() {
        for strategy in ["mdc", "kennard_stone"] {
            let spec = SelectionSpec {
                strategy: strategy.to_string(),
                target_count: 2,
                ..SelectionSpec::default()
            };
            assert_eq!(spec.run(&cluster_points()).unwrap(), vec![0, 3], "{strategy}");
        }

        let spec = SelectionSpec {
            strategy: "maximin".to_string(),
            target_count: 2,
            ..SelectionSpec::default()
        };
        // mean 3.5 is nearest the cluster; 0 comes first on the tie
        assert_eq!(spec.run(&cluster_points()).unwrap(), vec![0, 3]);
    }

    #[test]
    fn test_run_matrix() {
        let m = DistanceMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
        let spec = SelectionSpec {
            target_count: 2,
            ..SelectionSpec::default()
        };
        assert_eq!(spec.run_matrix(&m).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_round_trip_keeps_unknown_fields() {
        let spec = SelectionSpec::from_json(r#"{"v": 1, "note": "pilot"}"#).unwrap();
        assert!(spec.unknown_fields.contains_key("note"));
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["note"], "pilot");
    }
}
