//! Pairwise distance metrics
//!
//! Turns N feature rows into a [`DistanceMatrix`] for the strategies that
//! accept raw coordinates. Metric names follow the SciPy `pdist` spelling so
//! existing configurations carry over.
//!
//! Degenerate inputs never produce NaN: cosine and correlation distances
//! involving a zero-norm (or constant) row are `0.0`, and a Bray–Curtis pair
//! whose summed magnitude is zero is `0.0`.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{Diagnostic, ErrorCode, Result, SelectionError};
use crate::matrix::{DistanceMatrix, MIN_OBJECTS};

/// Names accepted by [`Metric::from_str`], for hints and documentation.
pub const METRIC_NAMES: &[&str] = &[
    "euclidean",
    "sqeuclidean",
    "cityblock",
    "chebyshev",
    "minkowski",
    "cosine",
    "correlation",
    "braycurtis",
    "canberra",
    "hamming",
];

/// Distance function between two feature rows
///
/// Deserialization goes through [`Metric::minkowski`], so an out-of-range
/// exponent is rejected when the metric is read.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "name", try_from = "MetricRepr")]
pub enum Metric {
    #[default]
    Euclidean,
    #[serde(rename = "sqeuclidean")]
    SqEuclidean,
    #[serde(alias = "manhattan")]
    Cityblock,
    Chebyshev,
    /// `(Σ|u-v|^p)^(1/p)`, `p >= 1`
    Minkowski { p: f64 },
    Cosine,
    Correlation,
    #[serde(rename = "braycurtis")]
    BrayCurtis,
    Canberra,
    /// Fraction of differing components
    Hamming,
}

/// Wire shape of [`Metric`], checked on conversion
#[derive(Deserialize)]
#[serde(rename_all = "snake_case", tag = "name")]
enum MetricRepr {
    Euclidean,
    #[serde(rename = "sqeuclidean")]
    SqEuclidean,
    #[serde(alias = "manhattan")]
    Cityblock,
    Chebyshev,
    Minkowski {
        #[serde(default = "default_minkowski_p")]
        p: f64,
    },
    Cosine,
    Correlation,
    #[serde(rename = "braycurtis")]
    BrayCurtis,
    Canberra,
    Hamming,
}

fn default_minkowski_p() -> f64 {
    2.0
}

impl TryFrom<MetricRepr> for Metric {
    type Error = SelectionError;

    fn try_from(repr: MetricRepr) -> Result<Self> {
        Ok(match repr {
            MetricRepr::Euclidean => Metric::Euclidean,
            MetricRepr::SqEuclidean => Metric::SqEuclidean,
            MetricRepr::Cityblock => Metric::Cityblock,
            MetricRepr::Chebyshev => Metric::Chebyshev,
            MetricRepr::Minkowski { p } => return Metric::minkowski(p),
            MetricRepr::Cosine => Metric::Cosine,
            MetricRepr::Correlation => Metric::Correlation,
            MetricRepr::BrayCurtis => Metric::BrayCurtis,
            MetricRepr::Canberra => Metric::Canberra,
            MetricRepr::Hamming => Metric::Hamming,
        })
    }
}

impl Metric {
    /// Check the parameters of a metric built directly from its variant.
    pub fn check(&self) -> Result<()> {
        match *self {
            Metric::Minkowski { p } => Metric::minkowski(p).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Minkowski metric with exponent `p`.
    pub fn minkowski(p: f64) -> Result<Self> {
        if p.is_finite() && p >= 1.0 {
            Ok(Metric::Minkowski { p })
        } else {
            Err(SelectionError::InvalidConfiguration(
                Diagnostic::new(
                    ErrorCode::InvalidMetricParameter,
                    "/metric_p",
                    format!("minkowski exponent must be a finite number >= 1, got {p}"),
                )
                .with_hint("Use p = 1 for cityblock or p = 2 for euclidean"),
            ))
        }
    }

    /// Parse a metric name and apply an optional parameter.
    ///
    /// Only `minkowski` takes a parameter (default `2.0`); passing one to any
    /// other metric is an error.
    pub fn parse_with_parameter(name: &str, p: Option<f64>) -> Result<Self> {
        let metric: Metric = name.parse()?;
        match (metric, p) {
            (Metric::Minkowski { .. }, Some(p)) => Metric::minkowski(p),
            (_, None) => Ok(metric),
            (other, Some(_)) => Err(SelectionError::config(
                ErrorCode::InvalidMetricParameter,
                "/metric_p",
                format!("metric '{}' does not take a parameter", other.as_str()),
            )),
        }
    }

    /// SciPy-style name of this metric
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::SqEuclidean => "sqeuclidean",
            Metric::Cityblock => "cityblock",
            Metric::Chebyshev => "chebyshev",
            Metric::Minkowski { .. } => "minkowski",
            Metric::Cosine => "cosine",
            Metric::Correlation => "correlation",
            Metric::BrayCurtis => "braycurtis",
            Metric::Canberra => "canberra",
            Metric::Hamming => "hamming",
        }
    }

    /// Distance between two rows of equal length.
    pub fn distance(&self, u: &[f64], v: &[f64]) -> f64 {
        debug_assert_eq!(u.len(), v.len());
        let pairs = || u.iter().zip(v);
        match *self {
            Metric::Euclidean => pairs().map(|(a, b)| (a - b) * (a - b)).sum::<f64>().sqrt(),
            Metric::SqEuclidean => pairs().map(|(a, b)| (a - b) * (a - b)).sum(),
            Metric::Cityblock => pairs().map(|(a, b)| (a - b).abs()).sum(),
            Metric::Chebyshev => pairs().map(|(a, b)| (a - b).abs()).fold(0.0, f64::max),
            Metric::Minkowski { p } => pairs()
                .map(|(a, b)| (a - b).abs().powf(p))
                .sum::<f64>()
                .powf(1.0 / p),
            Metric::Cosine => cosine_distance(u, v, 0.0, 0.0),
            Metric::Correlation => cosine_distance(u, v, mean(u), mean(v)),
            Metric::BrayCurtis => {
                let num: f64 = pairs().map(|(a, b)| (a - b).abs()).sum();
                let den: f64 = pairs().map(|(a, b)| (a + b).abs()).sum();
                if den > 0.0 {
                    num / den
                } else {
                    0.0
                }
            }
            Metric::Canberra => pairs()
                .map(|(a, b)| {
                    let den = a.abs() + b.abs();
                    if den > 0.0 {
                        (a - b).abs() / den
                    } else {
                        0.0
                    }
                })
                .sum(),
            Metric::Hamming => {
                if u.is_empty() {
                    0.0
                } else {
                    pairs().filter(|(a, b)| a != b).count() as f64 / u.len() as f64
                }
            }
        }
    }
}

impl FromStr for Metric {
    type Err = SelectionError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "euclidean" => Ok(Metric::Euclidean),
            "sqeuclidean" => Ok(Metric::SqEuclidean),
            "cityblock" | "manhattan" => Ok(Metric::Cityblock),
            "chebyshev" => Ok(Metric::Chebyshev),
            "minkowski" => Ok(Metric::Minkowski { p: 2.0 }),
            "cosine" => Ok(Metric::Cosine),
            "correlation" => Ok(Metric::Correlation),
            "braycurtis" => Ok(Metric::BrayCurtis),
            "canberra" => Ok(Metric::Canberra),
            "hamming" => Ok(Metric::Hamming),
            _ => Err(SelectionError::InvalidConfiguration(
                Diagnostic::new(
                    ErrorCode::UnknownMetric,
                    "/metric",
                    format!("unknown metric '{name}'"),
                )
                .with_hint(format!("Supported metrics: {}", METRIC_NAMES.join(", "))),
            )),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Minkowski { p } => write!(f, "minkowski(p={p})"),
            other => f.write_str(other.as_str()),
        }
    }
}

fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        0.0
    } else {
        x.iter().sum::<f64>() / x.len() as f64
    }
}

/// `1 - cos` of the rows after subtracting the given offsets, clamped to
/// `[0, 2]` against rounding.
fn cosine_distance(u: &[f64], v: &[f64], u_off: f64, v_off: f64) -> f64 {
    let (mut dot, mut nu, mut nv) = (0.0, 0.0, 0.0);
    for (a, b) in u.iter().zip(v) {
        let (a, b) = (a - u_off, b - v_off);
        dot += a * b;
        nu += a * a;
        nv += b * b;
    }
    if nu == 0.0 || nv == 0.0 {
        return 0.0;
    }
    (1.0 - dot / (nu.sqrt() * nv.sqrt())).clamp(0.0, 2.0)
}

/// Check that feature rows are usable: at least two rows, one shared
/// dimensionality of at least one.
pub(crate) fn check_points<R: AsRef<[f64]>>(points: &[R]) -> Result<usize> {
    if points.len() < MIN_OBJECTS {
        return Err(SelectionError::input(
            ErrorCode::TooSmall,
            "/points",
            format!(
                "selection needs at least {MIN_OBJECTS} objects, got {}",
                points.len()
            ),
        ));
    }
    let dim = points[0].as_ref().len();
    if dim == 0 {
        return Err(SelectionError::input(
            ErrorCode::EmptyFeatures,
            "/points/0",
            "feature rows must have at least one component",
        ));
    }
    for (i, row) in points.iter().enumerate().skip(1) {
        let len = row.as_ref().len();
        if len != dim {
            return Err(SelectionError::input(
                ErrorCode::RaggedFeatures,
                format!("/points/{i}"),
                format!("row {i} has {len} components, expected {dim}"),
            ));
        }
    }
    Ok(dim)
}

/// Compute the full distance matrix of `points` under `metric`.
///
/// The upper triangle is computed row-parallel and mirrored; the result goes
/// through the same validation as a caller-supplied matrix, so non-finite
/// input coordinates surface as [`SelectionError::InvalidInput`].
pub fn pairwise_distances<R>(points: &[R], metric: Metric) -> Result<DistanceMatrix>
where
    R: AsRef<[f64]> + Sync,
{
    metric.check()?;
    check_points(points)?;
    let n = points.len();
    trace_stage!("pairwise_distances");

    let upper: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let u = points[i].as_ref();
            ((i + 1)..n)
                .map(|j| metric.distance(u, points[j].as_ref()))
                .collect()
        })
        .collect();

    let mut data = vec![0.0; n * n];
    for (i, row) in upper.iter().enumerate() {
        for (offset, &d) in row.iter().enumerate() {
            let j = i + 1 + offset;
            data[i * n + j] = d;
            data[j * n + i] = d;
        }
    }

    trace_event!(debug, objects = n, metric = metric.as_str(), "computed distance matrix");
    DistanceMatrix::from_flat(n, data)
}
