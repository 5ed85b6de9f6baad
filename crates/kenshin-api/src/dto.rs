// SPDX-License-Identifier: Apache-2.0

use kenshin_model::{RawRecord, ValidationOutcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Response of `POST /api/file/parse`. Success implies every data row was
/// structurally sound; malformed rows fail the request instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    pub message: String,
    pub data: Vec<RawRecord>,
}

/// Response of `POST /api/file/validate`; flattens isValid/errors/rowCount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: ValidationOutcome,
}

/// Body of `POST /api/data/save`: one parsed row keyed by CSV column name
/// plus the owning user. Everything optional at the boundary; presence is
/// validated field by field so the 400 can name what is missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaveRecordRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "ID")]
    pub id: Option<Value>,
    #[serde(rename = "BMI")]
    pub bmi: Option<Value>,
    #[serde(rename = "sBP")]
    pub s_bp: Option<Value>,
    #[serde(rename = "dBP")]
    pub d_bp: Option<Value>,
    #[serde(rename = "BS")]
    pub bs: Option<Value>,
    #[serde(rename = "HbA1c")]
    pub hba1c: Option<Value>,
    #[serde(rename = "LDL")]
    pub ldl: Option<Value>,
    #[serde(rename = "TG")]
    pub tg: Option<Value>,
    #[serde(rename = "AST")]
    pub ast: Option<Value>,
    #[serde(rename = "ALT")]
    pub alt: Option<Value>,
    #[serde(rename = "GTP")]
    pub gtp: Option<Value>,
}

/// Body of `POST /api/analyze/extract`. Absent percentage falls back to the
/// stored extraction setting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub percentage: Option<Value>,
}

/// Body of `POST|PUT /api/scoring-rule/save`. The full body is persisted as
/// the rule payload; only `id` is mandatory at the boundary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringRuleSaveRequest {
    pub id: Option<Value>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigUpdateRequest {
    pub key: Option<String>,
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogWriteRequest {
    pub level: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Duck-typed numeric field: accepts a JSON number or a numeric string.
#[must_use]
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Duck-typed identifier field: accepts a JSON string or bare number.
#[must_use]
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
