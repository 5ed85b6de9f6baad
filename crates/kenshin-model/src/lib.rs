// SPDX-License-Identifier: Apache-2.0

//! Domain types shared across the kenshin crates: checkup records, subject
//! identifiers, validation errors, score distributions, and scoring rules.

#![forbid(unsafe_code)]

pub mod columns;
mod distribution;
mod record;
mod rule;
mod setting;
mod subject;
mod validation;

pub use distribution::{DistributionBucket, ScoreDistribution, BUCKET_LABELS};
pub use record::{ExtractedEntry, Measurements, RawRecord, ScoredRecord};
pub use rule::{CategoryRule, RuleError, ScoreBand, ScoringRule, Tier, TierCuts};
pub use setting::{
    scoring_rule_key, Setting, ACTIVE_RULE_KEY, EXTRACT_PERCENTAGE_KEY, SCORING_RULE_PREFIX,
};
pub use subject::{SubjectId, SubjectIdError, SUBJECT_ID_MAX_LEN, SUBJECT_ID_MIN_LEN};
pub use validation::{ValidationError, ValidationOutcome, ValidationReason};
