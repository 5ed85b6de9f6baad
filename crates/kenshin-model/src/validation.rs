// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationReason {
    #[serde(rename = "not-a-number")]
    NotANumber,
    #[serde(rename = "out-of-range")]
    OutOfRange,
    #[serde(rename = "bad-id-format")]
    BadIdFormat,
}

impl ValidationReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotANumber => "not-a-number",
            Self::OutOfRange => "out-of-range",
            Self::BadIdFormat => "bad-id-format",
        }
    }
}

impl Display for ValidationReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level finding. `row` is 1-based over the data rows (the header
/// does not count).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationError {
    pub row: usize,
    pub column: String,
    pub value: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    #[must_use]
    pub fn new(row: usize, column: &str, value: &str, reason: ValidationReason) -> Self {
        Self {
            row,
            column: column.to_string(),
            value: value.to_string(),
            reason,
        }
    }
}

/// Result of validating a parsed record batch. Errors keep row order, then
/// field order within each row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    #[serde(rename = "rowCount")]
    pub row_count: usize,
}

impl ValidationOutcome {
    #[must_use]
    pub fn new(errors: Vec<ValidationError>, row_count: usize) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            row_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_serializes_to_kebab_strings() {
        let json = serde_json::to_string(&ValidationReason::NotANumber).expect("serialize");
        assert_eq!(json, "\"not-a-number\"");
        let json = serde_json::to_string(&ValidationReason::BadIdFormat).expect("serialize");
        assert_eq!(json, "\"bad-id-format\"");
    }

    #[test]
    fn outcome_validity_tracks_error_emptiness() {
        assert!(ValidationOutcome::new(Vec::new(), 3).is_valid);
        let err = ValidationError::new(1, "BMI", "abc", ValidationReason::NotANumber);
        assert!(!ValidationOutcome::new(vec![err], 3).is_valid);
    }
}
