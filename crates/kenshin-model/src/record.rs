// SPDX-License-Identifier: Apache-2.0

use crate::columns;
use crate::rule::Tier;
use crate::subject::SubjectId;
use serde::{Deserialize, Serialize};

/// One CSV data row before validation, all fields still raw strings.
/// Lives only inside the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub subject_id: String,
    pub bmi: String,
    pub s_bp: String,
    pub d_bp: String,
    pub bs: String,
    pub hba1c: String,
    pub ldl: String,
    pub tg: String,
    pub ast: String,
    pub alt: String,
    pub gtp: String,
}

impl RawRecord {
    /// Raw numeric fields paired with their column names, in validation order.
    #[must_use]
    pub fn numeric_fields(&self) -> [(&'static str, &str); 10] {
        [
            (columns::BMI, self.bmi.as_str()),
            (columns::S_BP, self.s_bp.as_str()),
            (columns::D_BP, self.d_bp.as_str()),
            (columns::BS, self.bs.as_str()),
            (columns::HBA1C, self.hba1c.as_str()),
            (columns::LDL, self.ldl.as_str()),
            (columns::TG, self.tg.as_str()),
            (columns::AST, self.ast.as_str()),
            (columns::ALT, self.alt.as_str()),
            (columns::GTP, self.gtp.as_str()),
        ]
    }
}

/// Numeric view of a validated record, input to the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub bmi: f64,
    pub s_bp: f64,
    pub d_bp: f64,
    pub bs: f64,
    pub hba1c: f64,
    pub ldl: f64,
    pub tg: f64,
    pub ast: f64,
    pub alt: f64,
    pub gtp: f64,
}

impl Measurements {
    /// Look up a measurement by its canonical CSV column name.
    #[must_use]
    pub fn by_column(&self, column: &str) -> Option<f64> {
        match column {
            columns::BMI => Some(self.bmi),
            columns::S_BP => Some(self.s_bp),
            columns::D_BP => Some(self.d_bp),
            columns::BS => Some(self.bs),
            columns::HBA1C => Some(self.hba1c),
            columns::LDL => Some(self.ldl),
            columns::TG => Some(self.tg),
            columns::AST => Some(self.ast),
            columns::ALT => Some(self.alt),
            columns::GTP => Some(self.gtp),
            _ => None,
        }
    }
}

/// A persisted checkup record with computed sub-scores, tiers, and total.
/// Immutable after insert; timestamps are server-assigned unix millis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub subject_id: SubjectId,
    pub user_id: String,
    pub measurements: Measurements,
    pub bmi_score: f64,
    pub blood_pressure_score: f64,
    pub blood_sugar_score: f64,
    pub lipid_score: f64,
    pub liver_score: f64,
    pub total_score: f64,
    pub bmi_tier: Tier,
    pub blood_pressure_tier: Tier,
    pub blood_sugar_tier: Tier,
    pub lipid_tier: Tier,
    pub liver_tier: Tier,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Member of the current top-fraction extraction. The whole set is replaced
/// on each extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractedEntry {
    pub subject_id: String,
    pub total_score: f64,
}
