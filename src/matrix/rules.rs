//! Content rules for distance matrices.
//!
//! Shape is checked by the constructors before these run; the rules below
//! assume a square matrix with at least two rows.

use crate::errors::{Diagnostic, ErrorCode};
use crate::validation::{ValidationDiagnostic, ValidationEngine, ValidationRule};

use super::DistanceMatrix;

/// Cap on per-rule diagnostics so a garbage matrix does not produce N² entries.
const MAX_FINDINGS_PER_RULE: usize = 8;

impl ValidationEngine<DistanceMatrix> {
    /// Engine pre-loaded with the default matrix rules.
    pub fn for_matrices(tolerance: f64) -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(FiniteRule));
        engine.add_rule(Box::new(NonNegativeRule));
        engine.add_rule(Box::new(SymmetryRule { tolerance }));
        engine.add_rule(Box::new(ZeroDiagonalRule));
        engine
    }
}

fn entry_path(i: usize, j: usize) -> String {
    format!("/rows/{i}/{j}")
}

// ─── 1. Entries must be finite ──────────────────────────────────────────────

struct FiniteRule;

impl ValidationRule<DistanceMatrix> for FiniteRule {
    fn name(&self) -> &str {
        "finite"
    }

    fn validate(&self, m: &DistanceMatrix) -> Vec<ValidationDiagnostic> {
        m.as_slice()
            .iter()
            .enumerate()
            .filter(|&(_, d)| !d.is_finite())
            .take(MAX_FINDINGS_PER_RULE)
            .map(|(k, d)| {
                let (i, j) = (k / m.len(), k % m.len());
                ValidationDiagnostic::error(Diagnostic::new(
                    ErrorCode::NonFinite,
                    entry_path(i, j),
                    format!("distance between {i} and {j} is {d}"),
                ))
            })
            .collect()
    }
}

// ─── 2. Entries must be non-negative ────────────────────────────────────────

struct NonNegativeRule;

impl ValidationRule<DistanceMatrix> for NonNegativeRule {
    fn name(&self) -> &str {
        "non_negative"
    }

    fn validate(&self, m: &DistanceMatrix) -> Vec<ValidationDiagnostic> {
        m.as_slice()
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d < 0.0)
            .take(MAX_FINDINGS_PER_RULE)
            .map(|(k, d)| {
                let (i, j) = (k / m.len(), k % m.len());
                ValidationDiagnostic::error(
                    Diagnostic::new(
                        ErrorCode::NegativeDistance,
                        entry_path(i, j),
                        format!("distance between {i} and {j} is negative ({d})"),
                    )
                    .with_hint("Dissimilarities must be >= 0; convert similarities first"),
                )
            })
            .collect()
    }
}

// ─── 3. Matrix must be symmetric within tolerance ───────────────────────────

struct SymmetryRule {
    tolerance: f64,
}

impl ValidationRule<DistanceMatrix> for SymmetryRule {
    fn name(&self) -> &str {
        "symmetry"
    }

    fn validate(&self, m: &DistanceMatrix) -> Vec<ValidationDiagnostic> {
        let n = m.len();
        let mut out = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (m.get(i, j), m.get(j, i));
                // Non-finite entries are reported by the finite rule.
                if !a.is_finite() || !b.is_finite() {
                    continue;
                }
                let scale = a.abs().max(b.abs()).max(1.0);
                if (a - b).abs() > self.tolerance * scale {
                    out.push(ValidationDiagnostic::error(Diagnostic::new(
                        ErrorCode::Asymmetric,
                        entry_path(i, j),
                        format!("d[{i}][{j}] = {a} but d[{j}][{i}] = {b}"),
                    )));
                    if out.len() == MAX_FINDINGS_PER_RULE {
                        return out;
                    }
                }
            }
        }
        out
    }
}

// ─── 4. Diagonal should be zero (warning) ───────────────────────────────────

struct ZeroDiagonalRule;

impl ValidationRule<DistanceMatrix> for ZeroDiagonalRule {
    fn name(&self) -> &str {
        "zero_diagonal"
    }

    fn validate(&self, m: &DistanceMatrix) -> Vec<ValidationDiagnostic> {
        (0..m.len())
            .filter(|&i| m.get(i, i) != 0.0 && m.get(i, i).is_finite())
            .take(MAX_FINDINGS_PER_RULE)
            .map(|i| {
                ValidationDiagnostic::warning(
                    Diagnostic::new(
                        ErrorCode::NonZeroDiagonal,
                        entry_path(i, i),
                        format!("self-distance of object {i} is {}", m.get(i, i)),
                    )
                    .with_hint("Self entries are identified by index, so selection still runs"),
                )
            })
            .collect()
    }
}
