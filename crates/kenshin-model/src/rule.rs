// SPDX-License-Identifier: Apache-2.0

use crate::columns;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Four-tier evaluation label, A best through D worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    C,
    D,
}

impl Tier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    pub fn parse(input: &str) -> Result<Self, RuleError> {
        match input {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            other => Err(RuleError::BadTierLabel(other.to_string())),
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scoring band: a measurement in `[min, max]` earns `points`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreBand {
    pub min: f64,
    pub max: f64,
    pub points: f64,
}

impl ScoreBand {
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Tier cut points over a category sub-score: `a_min <= s` is A, then B, C,
/// anything below `c_min` is D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierCuts {
    pub a_min: f64,
    pub b_min: f64,
    pub c_min: f64,
}

impl TierCuts {
    #[must_use]
    pub fn tier_for(&self, score: f64) -> Tier {
        if score >= self.a_min {
            Tier::A
        } else if score >= self.b_min {
            Tier::B
        } else if score >= self.c_min {
            Tier::C
        } else {
            Tier::D
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

/// Rule data for one scoring category: band tables per measurement column,
/// tier cut points, and the category's weight in the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    #[serde(default)]
    pub measurements: BTreeMap<String, Vec<ScoreBand>>,
    pub cuts: TierCuts,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

/// Externally configured scoring rule. Point values are data, never code;
/// a record cannot be scored without a well-formed rule in settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryRule>,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum RuleError {
    Deserialize(String),
    MissingCategory(String),
    MissingMeasurement(String, String),
    EmptyBands(String, String),
    InvertedBand(String, String),
    BadCuts(String),
    BadWeight(String),
    BadTierLabel(String),
}

impl Display for RuleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deserialize(msg) => write!(f, "scoring rule does not deserialize: {msg}"),
            Self::MissingCategory(cat) => write!(f, "scoring rule lacks category {cat}"),
            Self::MissingMeasurement(cat, col) => {
                write!(f, "category {cat} lacks a band table for {col}")
            }
            Self::EmptyBands(cat, col) => {
                write!(f, "category {cat} has an empty band table for {col}")
            }
            Self::InvertedBand(cat, col) => {
                write!(f, "category {cat} has a band with min > max for {col}")
            }
            Self::BadCuts(cat) => {
                write!(f, "category {cat} tier cuts must satisfy a_min >= b_min >= c_min")
            }
            Self::BadWeight(cat) => write!(f, "category {cat} weight must be finite and > 0"),
            Self::BadTierLabel(raw) => write!(f, "unknown tier label: {raw}"),
        }
    }
}

impl std::error::Error for RuleError {}

impl ScoringRule {
    /// Deserialize a rule from its stored JSON settings value.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, RuleError> {
        serde_json::from_value(value.clone()).map_err(|e| RuleError::Deserialize(e.to_string()))
    }

    /// Check the rule covers every category and measurement column and that
    /// its numbers are usable. A rule that fails here is treated as absent
    /// configuration by the scorer.
    pub fn validate(&self) -> Result<(), RuleError> {
        for (category, members) in columns::CATEGORIES {
            let rule = self
                .categories
                .get(category)
                .ok_or_else(|| RuleError::MissingCategory(category.to_string()))?;
            if !rule.weight.is_finite() || rule.weight <= 0.0 {
                return Err(RuleError::BadWeight(category.to_string()));
            }
            if rule.cuts.a_min < rule.cuts.b_min || rule.cuts.b_min < rule.cuts.c_min {
                return Err(RuleError::BadCuts(category.to_string()));
            }
            for column in members {
                let bands = rule.measurements.get(*column).ok_or_else(|| {
                    RuleError::MissingMeasurement(category.to_string(), (*column).to_string())
                })?;
                if bands.is_empty() {
                    return Err(RuleError::EmptyBands(
                        category.to_string(),
                        (*column).to_string(),
                    ));
                }
                if bands.iter().any(|b| b.min > b.max) {
                    return Err(RuleError::InvertedBand(
                        category.to_string(),
                        (*column).to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
