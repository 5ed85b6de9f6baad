// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Generic key/value configuration row. Values are free-form JSON documents;
/// interpretation belongs to the consumer (scoring rules, extraction
/// percentage, active-rule pointer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Setting {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: i64,
}

/// Settings key of the scoring rule with the given id.
#[must_use]
pub fn scoring_rule_key(id: &str) -> String {
    format!("scoring_rule:{id}")
}

/// Settings key naming the active scoring rule id.
pub const ACTIVE_RULE_KEY: &str = "active_rule";

/// Settings key for the default extraction percentage.
pub const EXTRACT_PERCENTAGE_KEY: &str = "extract_percentage";

/// Prefix shared by all stored scoring rules.
pub const SCORING_RULE_PREFIX: &str = "scoring_rule:";
