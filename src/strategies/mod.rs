//! Selection strategies
//!
//! - [`MostDescriptive`]: Most Descriptive Compound selection, from raw
//!   feature rows (via a metric) or a precomputed matrix
//! - [`KennardStone`]: rank-based Kennard–Stone over a borrowed matrix with
//!   incremental "get next" access
//! - [`MaxMin`]: classic Kennard–Stone maximin design (seed near the mean,
//!   then repeatedly the object farthest from everything selected)
//!
//! The first two share the greedy engine in [`crate::engine`].

pub mod kennard_stone;
pub mod maximin;
pub mod mdc;

pub use kennard_stone::KennardStone;
pub use maximin::MaxMin;
pub use mdc::MostDescriptive;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Diagnostic, ErrorCode, Result, SelectionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    #[serde(alias = "mdc", alias = "most_descriptive_compound")]
    MostDescriptive,
    #[serde(alias = "ks")]
    KennardStone,
    #[serde(rename = "maximin", alias = "kennard_stone_maximin")]
    MaxMin,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::MostDescriptive => "most_descriptive",
            Strategy::KennardStone => "kennard_stone",
            Strategy::MaxMin => "maximin",
        }
    }

    /// Whether the strategy runs on the shared greedy information engine
    pub fn uses_information_vector(&self) -> bool {
        matches!(self, Strategy::MostDescriptive | Strategy::KennardStone)
    }
}

impl FromStr for Strategy {
    type Err = SelectionError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "mdc" | "most_descriptive" | "most_descriptive_compound" => Ok(Strategy::MostDescriptive),
            "ks" | "kennard_stone" | "kennardstone" => Ok(Strategy::KennardStone),
            "maximin" | "kennard_stone_maximin" => Ok(Strategy::MaxMin),
            _ => Err(SelectionError::InvalidConfiguration(
                Diagnostic::new(
                    ErrorCode::UnknownStrategy,
                    "/strategy",
                    format!("unknown strategy '{value}'"),
                )
                .with_hint("Use \"mdc\", \"kennard_stone\" or \"maximin\""),
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("MDC".parse::<Strategy>().unwrap(), Strategy::MostDescriptive);
        assert_eq!("ks".parse::<Strategy>().unwrap(), Strategy::KennardStone);
        assert_eq!(
            "kennard_stone_maximin".parse::<Strategy>().unwrap(),
            Strategy::MaxMin
        );
    }

    #[test]
    fn test_unknown_strategy() {
        let err = "disc".parse::<Strategy>().unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownStrategy);
    }

    #[test]
    fn test_serde_names() {
        let s: Strategy = serde_json::from_str("\"mdc\"").unwrap();
        assert_eq!(s, Strategy::MostDescriptive);
        let s: Strategy = serde_json::from_str("\"maximin\"").unwrap();
        assert_eq!(s, Strategy::MaxMin);
        assert_eq!(
            serde_json::to_string(&Strategy::KennardStone).unwrap(),
            "\"kennard_stone\""
        );
    }

    #[test]
    fn test_engine_sharing() {
        assert!(Strategy::MostDescriptive.uses_information_vector());
        assert!(Strategy::KennardStone.uses_information_vector());
        assert!(!Strategy::MaxMin.uses_information_vector());
    }
}
