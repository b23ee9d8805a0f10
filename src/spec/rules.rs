//! Validation rules for [`SelectionSpec`] documents.
//!
//! ```
//! use rapid_mdc::spec::SelectionSpec;
//! use rapid_mdc::validation::ValidationEngine;
//!
//! let spec: SelectionSpec = serde_json::from_str(r#"{"v": 1, "target_count": 5}"#).unwrap();
//! let report = ValidationEngine::<SelectionSpec>::with_defaults().validate(&spec);
//! assert!(report.is_valid());
//! ```

use std::collections::HashMap;

use crate::errors::{Diagnostic, ErrorCode};
use crate::metric::Metric;
use crate::strategies::Strategy;
use crate::validation::{ValidationDiagnostic, ValidationEngine, ValidationRule};

use super::{SelectionSpec, SPEC_VERSION};

impl ValidationEngine<SelectionSpec> {
    /// Engine pre-loaded with every spec rule.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(StrategyRule));
        engine.add_rule(Box::new(TargetCountRule));
        engine.add_rule(Box::new(MetricRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }
}

// ─── 1. Version ─────────────────────────────────────────────────────────────

struct VersionRule;

impl ValidationRule<SelectionSpec> for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &SelectionSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            Diagnostic::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("unsupported spec version {}", spec.v),
            )
            .with_hint(format!("Set \"v\": {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. Strategy name ───────────────────────────────────────────────────────

struct StrategyRule;

impl ValidationRule<SelectionSpec> for StrategyRule {
    fn name(&self) -> &str {
        "strategy"
    }

    fn validate(&self, spec: &SelectionSpec) -> Vec<ValidationDiagnostic> {
        match spec.strategy.parse::<Strategy>() {
            Ok(_) => vec![],
            Err(err) => err
                .diagnostic()
                .cloned()
                .map(ValidationDiagnostic::error)
                .into_iter()
                .collect(),
        }
    }
}

// ─── 3. Target count ────────────────────────────────────────────────────────

struct TargetCountRule;

impl ValidationRule<SelectionSpec> for TargetCountRule {
    fn name(&self) -> &str {
        "target_count"
    }

    fn validate(&self, spec: &SelectionSpec) -> Vec<ValidationDiagnostic> {
        if spec.target_count < 0 {
            return vec![ValidationDiagnostic::error(
                Diagnostic::new(
                    ErrorCode::InvalidTargetCount,
                    "/target_count",
                    format!("target_count must not be negative, got {}", spec.target_count),
                )
                .with_hint("Use 0 for autostop"),
            )];
        }
        // maximin has no autostop
        if spec.target_count == 0 && spec.strategy.parse::<Strategy>() == Ok(Strategy::MaxMin) {
            return vec![ValidationDiagnostic::error(
                Diagnostic::new(
                    ErrorCode::InvalidTargetCount,
                    "/target_count",
                    "maximin needs a positive target_count",
                )
                .with_hint("Use \"mdc\" or \"kennard_stone\" for autostop"),
            )];
        }
        vec![]
    }
}

// ─── 4. Metric name and parameter ───────────────────────────────────────────

struct MetricRule;

impl ValidationRule<SelectionSpec> for MetricRule {
    fn name(&self) -> &str {
        "metric"
    }

    fn validate(&self, spec: &SelectionSpec) -> Vec<ValidationDiagnostic> {
        match Metric::parse_with_parameter(&spec.metric, spec.metric_p) {
            Ok(_) => vec![],
            Err(err) => err
                .diagnostic()
                .cloned()
                .map(ValidationDiagnostic::error)
                .into_iter()
                .collect(),
        }
    }
}

// ─── 5. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    fn check_unknowns(
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let diag_fn = if strict {
                    ValidationDiagnostic::error
                } else {
                    ValidationDiagnostic::warning
                };
                diag_fn(
                    Diagnostic::new(
                        ErrorCode::UnknownField,
                        format!("/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

impl ValidationRule<SelectionSpec> for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &SelectionSpec) -> Vec<ValidationDiagnostic> {
        Self::check_unknowns(&spec.unknown_fields, spec.strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Severity;

    fn spec(json: &str) -> SelectionSpec {
        serde_json::from_str(json).unwrap()
    }

    fn engine() -> ValidationEngine<SelectionSpec> {
        ValidationEngine::with_defaults()
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            engine().rule_names(),
            vec!["version", "strategy", "target_count", "metric", "unknown_fields"]
        );
    }

    #[test]
    fn test_valid_spec() {
        let report = engine().validate(&spec(r#"{"v": 1, "strategy": "maximin", "target_count": 4}"#));
        assert!(report.is_empty());
    }

    #[test]
    fn test_collects_every_problem() {
        let report = engine().validate(&spec(
            r#"{"v": 2, "strategy": "disc", "target_count": -3, "metric": "nope"}"#,
        ));
        let codes: Vec<ErrorCode> = report.errors().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![
                ErrorCode::UnsupportedVersion,
                ErrorCode::UnknownStrategy,
                ErrorCode::InvalidTargetCount,
                ErrorCode::UnknownMetric,
            ]
        );
    }

    #[test]
    fn test_maximin_needs_target() {
        let report = engine().validate(&spec(r#"{"strategy": "maximin"}"#));
        let err = report.errors().next().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidTargetCount);
    }

    #[test]
    fn test_metric_parameter_on_wrong_metric() {
        let report = engine().validate(&spec(r#"{"metric": "cosine", "metric_p": 2.0}"#));
        let err = report.errors().next().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidMetricParameter);
        assert_eq!(err.path, "/metric_p");
    }

    #[test]
    fn test_unknown_fields_non_strict_are_warnings() {
        let report = engine().validate(&spec(r#"{"seed": 4, "alpha": 1}"#));
        assert!(report.is_valid());
        assert_eq!(report.len(), 2);
        assert!(report
            .diagnostics
            .iter()
            .all(|d| d.severity == Severity::Warning));
        let paths: Vec<&str> = report.warnings().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["/alpha", "/seed"]);
    }

    #[test]
    fn test_unknown_fields_strict_are_errors() {
        let report = engine().validate(&spec(r#"{"strict": true, "seed": 4}"#));
        assert!(report.has_errors());
        assert_eq!(report.errors().next().unwrap().code, ErrorCode::UnknownField);
    }
}
