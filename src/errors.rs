//! Error types for the selection engine.
//!
//! Every failure carries a [`Diagnostic`]: a stable [`ErrorCode`], a
//! JSON-pointer-like path to the offending input, a message and an optional
//! hint. The same diagnostic type is collected by the validation engine
//! (see [`crate::validation`]), so a rejected matrix or spec reports exactly
//! what the validator found.

use std::fmt;

use serde::Serialize;

/// Stable, machine-readable identifier for a class of problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input shape and content
    NotSquare,
    TooSmall,
    NonFinite,
    NegativeDistance,
    Asymmetric,
    NonZeroDiagonal,
    RaggedFeatures,
    EmptyFeatures,
    IndexOutOfRange,
    // Selection state
    Exhausted,
    // Configuration
    InvalidTargetCount,
    UnknownMetric,
    InvalidMetricParameter,
    UnknownStrategy,
    UnsupportedVersion,
    UnknownField,
    MalformedSpec,
}

impl ErrorCode {
    /// Returns the snake_case name used in JSON and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotSquare => "not_square",
            Self::TooSmall => "too_small",
            Self::NonFinite => "non_finite",
            Self::NegativeDistance => "negative_distance",
            Self::Asymmetric => "asymmetric",
            Self::NonZeroDiagonal => "non_zero_diagonal",
            Self::RaggedFeatures => "ragged_features",
            Self::EmptyFeatures => "empty_features",
            Self::IndexOutOfRange => "index_out_of_range",
            Self::Exhausted => "exhausted",
            Self::InvalidTargetCount => "invalid_target_count",
            Self::UnknownMetric => "unknown_metric",
            Self::InvalidMetricParameter => "invalid_metric_parameter",
            Self::UnknownStrategy => "unknown_strategy",
            Self::UnsupportedVersion => "unsupported_version",
            Self::UnknownField => "unknown_field",
            Self::MalformedSpec => "malformed_spec",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A located finding: what is wrong, where, and how to fix it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: ErrorCode,
    /// Location of the problem, e.g. `"/rows/3"` or `"/metric"`.
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

/// Errors surfaced by matrix construction, configuration and selection.
///
/// All errors are raised synchronously to the immediate caller. A failed
/// selection leaves whatever was already selected readable on the selector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    /// The distance matrix or feature rows are unusable.
    #[error("invalid input: {0}")]
    InvalidInput(Diagnostic),

    /// `select_next` was called after every object had been selected.
    #[error("selection exhausted: all {total} objects have already been selected")]
    ExhaustedSelection {
        /// Number of objects in the set
        total: usize,
    },

    /// Target count, metric or selection spec is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(Diagnostic),
}

impl SelectionError {
    /// The stable code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(d) | Self::InvalidConfiguration(d) => d.code,
            Self::ExhaustedSelection { .. } => ErrorCode::Exhausted,
        }
    }

    /// The attached diagnostic, if any.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::InvalidInput(d) | Self::InvalidConfiguration(d) => Some(d),
            Self::ExhaustedSelection { .. } => None,
        }
    }

    pub(crate) fn input(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput(Diagnostic::new(code, path, message))
    }

    pub(crate) fn config(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(Diagnostic::new(code, path, message))
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SelectionError>;
