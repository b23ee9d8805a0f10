//! Rule-based validation engine.
//!
//! The engine runs every registered [`ValidationRule`] against a subject and
//! collects all diagnostics into a [`ValidationReport`]. It never
//! short-circuits on the first error, so callers see every problem at once.
//!
//! Two subjects are validated this way: [`DistanceMatrix`] contents (see
//! [`crate::matrix::rules`]) and [`SelectionSpec`] documents (see
//! [`crate::spec::rules`]).
//!
//! [`DistanceMatrix`]: crate::matrix::DistanceMatrix
//! [`SelectionSpec`]: crate::spec::SelectionSpec

use serde::Serialize;

use crate::errors::{Diagnostic, Result, SelectionError};

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding with its severity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

impl ValidationDiagnostic {
    pub fn error(diagnostic: Diagnostic) -> Self {
        Self {
            severity: Severity::Error,
            diagnostic,
        }
    }

    pub fn warning(diagnostic: Diagnostic) -> Self {
        Self {
            severity: Severity::Warning,
            diagnostic,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.diagnostic)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.diagnostic)
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Turn the report into a `Result`, mapping the first error through
    /// `into_error`. Warnings are logged and otherwise dropped.
    pub fn into_result(self, into_error: fn(Diagnostic) -> SelectionError) -> Result<()> {
        let mut first_error = None;
        for entry in self.diagnostics {
            match entry.severity {
                Severity::Error if first_error.is_none() => first_error = Some(entry.diagnostic),
                Severity::Error => {}
                Severity::Warning => {
                    trace_event!(warn, code = %entry.diagnostic.code, path = %entry.diagnostic.path, "{}", entry.diagnostic.message);
                }
            }
        }
        match first_error {
            Some(diagnostic) => Err(into_error(diagnostic)),
            None => Ok(()),
        }
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects a subject and returns zero or more
/// diagnostics.
///
/// Rules are stateless apart from their parameters and must be
/// `Send + Sync` so a long-lived engine can be shared across threads.
pub trait ValidationRule<T: ?Sized>: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"symmetry"`).
    fn name(&self) -> &str;

    /// Inspect `subject` and return any findings.
    fn validate(&self, subject: &T) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against a subject and collects all
/// diagnostics into a [`ValidationReport`].
pub struct ValidationEngine<T: ?Sized> {
    rules: Vec<Box<dyn ValidationRule<T>>>,
}

impl<T: ?Sized> ValidationEngine<T> {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register an additional rule.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule<T>>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in execution order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `subject` and return the collected report.
    pub fn validate(&self, subject: &T) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(subject));
        }
        report
    }
}

impl<T: ?Sized> Default for ValidationEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}
