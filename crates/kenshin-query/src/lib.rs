// SPDX-License-Identifier: Apache-2.0

//! Read-side views over persisted records: the five-bucket score
//! distribution and the top-fraction extraction plan. Pure functions; the
//! server wires them to the store.

#![forbid(unsafe_code)]

use kenshin_model::{ExtractedEntry, ScoreDistribution, ScoredRecord};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum QueryError {
    /// Extraction fraction outside (0, 1].
    InvalidFraction(f64),
    /// Extraction percentage outside (0, 100].
    InvalidPercentage(f64),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFraction(p) => {
                write!(f, "extraction fraction must be in (0, 1], got {p}")
            }
            Self::InvalidPercentage(p) => {
                write!(f, "extraction percentage must be in (0, 100], got {p}")
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// Bucket the total-score projection. The strict all-or-nothing read of the
/// projection itself happens at the store; by the time scores reach this
/// function they are numbers, and bucketing cannot fail. Empty input is a
/// valid all-zero distribution.
#[must_use]
pub fn aggregate_scores(scores: &[f64]) -> ScoreDistribution {
    ScoreDistribution::from_scores(scores)
}

/// Convert a request percentage to an extraction fraction.
pub fn fraction_from_percentage(percentage: f64) -> Result<f64, QueryError> {
    if !percentage.is_finite() || percentage <= 0.0 || percentage > 100.0 {
        return Err(QueryError::InvalidPercentage(percentage));
    }
    Ok(percentage / 100.0)
}

/// Select the top fraction of records by total score.
///
/// Fraction is validated before anything else so callers can refuse the
/// request without touching the store. Sort is stable descending: equal
/// totals keep input (insertion/query) order. Selection size is
/// `max(1, floor(n * fraction))`; zero candidates yields an empty plan and
/// the caller skips all store mutation.
pub fn plan_extraction(
    records: &[ScoredRecord],
    fraction: f64,
) -> Result<Vec<ExtractedEntry>, QueryError> {
    if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
        return Err(QueryError::InvalidFraction(fraction));
    }
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let mut ranked: Vec<&ScoredRecord> = records.iter().collect();
    ranked.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(Ordering::Equal)
    });

    let take = ((records.len() as f64) * fraction).floor() as usize;
    let take = take.max(1);
    Ok(ranked
        .into_iter()
        .take(take)
        .map(|record| ExtractedEntry {
            subject_id: record.subject_id.as_str().to_string(),
            total_score: record.total_score,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kenshin_model::{Measurements, SubjectId, Tier};

    fn record(subject: &str, total: f64) -> ScoredRecord {
        ScoredRecord {
            subject_id: SubjectId::parse(subject).expect("subject id"),
            user_id: "u1".to_string(),
            measurements: Measurements {
                bmi: 22.0,
                s_bp: 120.0,
                d_bp: 80.0,
                bs: 90.0,
                hba1c: 5.5,
                ldl: 100.0,
                tg: 150.0,
                ast: 20.0,
                alt: 20.0,
                gtp: 30.0,
            },
            bmi_score: 0.0,
            blood_pressure_score: 0.0,
            blood_sugar_score: 0.0,
            lipid_score: 0.0,
            liver_score: 0.0,
            total_score: total,
            bmi_tier: Tier::C,
            blood_pressure_tier: Tier::C,
            blood_sugar_tier: Tier::C,
            lipid_tier: Tier::C,
            liver_tier: Tier::C,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn aggregation_counts_sum_to_input_length() {
        let scores = [49.0, 50.0, 200.0, 120.0];
        let dist = aggregate_scores(&scores);
        assert_eq!(dist.total(), 4);
        assert_eq!(dist.count_for("0-49"), Some(1));
        assert_eq!(dist.count_for("50-99"), Some(1));
        assert_eq!(dist.count_for("100-149"), Some(1));
        assert_eq!(dist.count_for("200+"), Some(1));
    }

    #[test]
    fn half_of_ten_records_selects_exactly_five_sorted_descending() {
        let records: Vec<ScoredRecord> = (0..10)
            .map(|i| record(&format!("10{i:02}"), f64::from(i) * 10.0))
            .collect();
        let plan = plan_extraction(&records, 0.5).expect("plan");
        assert_eq!(plan.len(), 5);
        let totals: Vec<f64> = plan.iter().map(|e| e.total_score).collect();
        assert_eq!(totals, vec![90.0, 80.0, 70.0, 60.0, 50.0]);
    }

    #[test]
    fn fraction_bounds_are_rejected_before_any_work() {
        for bad in [0.0, -0.2, 1.5, f64::NAN] {
            let err = plan_extraction(&[record("1234", 10.0)], bad).expect_err("must reject");
            assert!(matches!(err, QueryError::InvalidFraction(_)));
        }
    }

    #[test]
    fn small_sets_still_extract_at_least_one() {
        let records = vec![record("1111", 10.0), record("2222", 90.0), record("3333", 50.0)];
        let plan = plan_extraction(&records, 0.1).expect("plan");
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].subject_id, "2222");
    }

    #[test]
    fn equal_totals_keep_input_order() {
        let records = vec![
            record("1111", 80.0),
            record("2222", 80.0),
            record("3333", 80.0),
            record("4444", 20.0),
        ];
        let plan = plan_extraction(&records, 0.75).expect("plan");
        let subjects: Vec<&str> = plan.iter().map(|e| e.subject_id.as_str()).collect();
        assert_eq!(subjects, vec!["1111", "2222", "3333"]);
    }

    #[test]
    fn empty_record_set_yields_empty_plan() {
        assert_eq!(plan_extraction(&[], 0.5).expect("plan"), Vec::new());
    }

    #[test]
    fn percentage_conversion_validates_bounds() {
        assert_eq!(fraction_from_percentage(50.0), Ok(0.5));
        assert_eq!(fraction_from_percentage(100.0), Ok(1.0));
        assert!(matches!(
            fraction_from_percentage(0.0),
            Err(QueryError::InvalidPercentage(_))
        ));
        assert!(matches!(
            fraction_from_percentage(150.0),
            Err(QueryError::InvalidPercentage(_))
        ));
    }
}
