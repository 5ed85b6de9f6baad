// SPDX-License-Identifier: Apache-2.0

//! Category scoring. Point values live in externally configured
//! [`ScoringRule`] settings data; this crate only applies them. Scoring is
//! pure and deterministic: the same measurements under the same rule always
//! produce the same breakdown.

#![forbid(unsafe_code)]

use kenshin_model::{columns, Measurements, RuleError, ScoreBand, ScoringRule, Tier};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScoreError {
    /// No usable scoring rule is configured. Never silently defaulted.
    MissingConfiguration(String),
}

impl Display for ScoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingConfiguration(msg) => write!(f, "missing scoring configuration: {msg}"),
        }
    }
}

impl std::error::Error for ScoreError {}

impl From<RuleError> for ScoreError {
    fn from(err: RuleError) -> Self {
        Self::MissingConfiguration(err.to_string())
    }
}

/// Sub-score and tier for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryOutcome {
    pub score: f64,
    pub tier: Tier,
}

/// Full scoring result for one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub bmi: CategoryOutcome,
    pub blood_pressure: CategoryOutcome,
    pub blood_sugar: CategoryOutcome,
    pub lipid: CategoryOutcome,
    pub liver: CategoryOutcome,
    pub total_score: f64,
}

fn band_points(bands: &[ScoreBand], value: f64) -> f64 {
    bands
        .iter()
        .find(|band| band.contains(value))
        .map_or(0.0, |band| band.points)
}

fn category_outcome(
    rule: &ScoringRule,
    category: &str,
    members: &[&str],
    measurements: &Measurements,
) -> CategoryOutcome {
    // validate() has already guaranteed category and band-table presence.
    let category_rule = &rule.categories[category];
    let mut score = 0.0;
    for column in members {
        if let Some(value) = measurements.by_column(column) {
            score += band_points(&category_rule.measurements[*column], value);
        }
    }
    CategoryOutcome {
        score,
        tier: category_rule.cuts.tier_for(score),
    }
}

/// Score one validated record under the given rule.
///
/// The rule is re-validated here so a malformed settings document surfaces
/// as a configuration error at the call site instead of a panic deeper in.
pub fn score_record(
    measurements: &Measurements,
    rule: &ScoringRule,
) -> Result<ScoreBreakdown, ScoreError> {
    rule.validate()?;

    let mut outcomes = [CategoryOutcome {
        score: 0.0,
        tier: Tier::D,
    }; 5];
    let mut total = 0.0;
    for (i, (category, members)) in columns::CATEGORIES.iter().enumerate() {
        let outcome = category_outcome(rule, category, members, measurements);
        total += outcome.score * rule.categories[*category].weight;
        outcomes[i] = outcome;
    }

    Ok(ScoreBreakdown {
        bmi: outcomes[0],
        blood_pressure: outcomes[1],
        blood_sugar: outcomes[2],
        lipid: outcomes[3],
        liver: outcomes[4],
        total_score: total,
    })
}

/// Normalization applied on the persistence path: an absent or non-finite
/// total becomes 0.0. This is a documented default, not a scoring decision.
#[must_use]
pub fn normalize_total(total: Option<f64>) -> f64 {
    match total {
        Some(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kenshin_model::{CategoryRule, TierCuts};
    use std::collections::BTreeMap;

    fn band(min: f64, max: f64, points: f64) -> ScoreBand {
        ScoreBand { min, max, points }
    }

    /// Fixture rule: healthy-range measurements earn 10 points each,
    /// everything else 2; tiers cut per category member count.
    fn fixture_rule() -> ScoringRule {
        let tables: [(&str, Vec<ScoreBand>); 10] = [
            (columns::BMI, vec![band(18.5, 24.9, 10.0), band(10.0, 50.0, 2.0)]),
            (columns::S_BP, vec![band(90.0, 129.0, 10.0), band(60.0, 200.0, 2.0)]),
            (columns::D_BP, vec![band(60.0, 84.0, 10.0), band(40.0, 130.0, 2.0)]),
            (columns::BS, vec![band(70.0, 99.0, 10.0), band(50.0, 200.0, 2.0)]),
            (columns::HBA1C, vec![band(4.0, 5.9, 10.0), band(4.0, 10.0, 2.0)]),
            (columns::LDL, vec![band(30.0, 119.0, 10.0), band(30.0, 300.0, 2.0)]),
            (columns::TG, vec![band(30.0, 149.0, 10.0), band(30.0, 1000.0, 2.0)]),
            (columns::AST, vec![band(10.0, 30.0, 10.0), band(10.0, 200.0, 2.0)]),
            (columns::ALT, vec![band(10.0, 30.0, 10.0), band(10.0, 200.0, 2.0)]),
            (columns::GTP, vec![band(10.0, 50.0, 10.0), band(10.0, 500.0, 2.0)]),
        ];
        let mut categories = BTreeMap::new();
        for (category, members) in columns::CATEGORIES {
            let mut measurements = BTreeMap::new();
            for column in members {
                let bands = tables
                    .iter()
                    .find(|(name, _)| name == column)
                    .map(|(_, bands)| bands.clone())
                    .expect("fixture covers all columns");
                measurements.insert((*column).to_string(), bands);
            }
            let full = members.len() as f64 * 10.0;
            categories.insert(
                category.to_string(),
                CategoryRule {
                    measurements,
                    cuts: TierCuts {
                        a_min: full,
                        b_min: full * 0.6,
                        c_min: full * 0.3,
                    },
                    weight: 1.0,
                },
            );
        }
        ScoringRule {
            id: "1".to_string(),
            name: "fixture".to_string(),
            categories,
        }
    }

    fn healthy() -> Measurements {
        Measurements {
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
        }
    }

    #[test]
    fn healthy_record_scores_top_tier_in_most_categories() {
        let breakdown = score_record(&healthy(), &fixture_rule()).expect("score");
        assert_eq!(breakdown.bmi.score, 10.0);
        assert_eq!(breakdown.bmi.tier, Tier::A);
        assert_eq!(breakdown.blood_pressure.score, 20.0);
        assert_eq!(breakdown.blood_pressure.tier, Tier::A);
        // TG 150 falls out of the healthy band, into the 2-point fallback.
        assert_eq!(breakdown.lipid.score, 12.0);
        assert_eq!(breakdown.lipid.tier, Tier::B);
        assert_eq!(breakdown.liver.score, 30.0);
        assert_eq!(
            breakdown.total_score,
            breakdown.bmi.score
                + breakdown.blood_pressure.score
                + breakdown.blood_sugar.score
                + breakdown.lipid.score
                + breakdown.liver.score
        );
    }

    #[test]
    fn scoring_is_deterministic() {
        let rule = fixture_rule();
        let first = score_record(&healthy(), &rule).expect("score");
        let second = score_record(&healthy(), &rule).expect("score");
        assert_eq!(first, second);
    }

    #[test]
    fn value_outside_every_band_scores_zero() {
        let mut rule = fixture_rule();
        // Narrow BMI to a single band so a miss is possible.
        rule.categories
            .get_mut(columns::CATEGORY_BMI)
            .expect("bmi")
            .measurements
            .insert(columns::BMI.to_string(), vec![band(18.5, 24.9, 10.0)]);
        let mut m = healthy();
        m.bmi = 30.0;
        let breakdown = score_record(&m, &rule).expect("score");
        assert_eq!(breakdown.bmi.score, 0.0);
        assert_eq!(breakdown.bmi.tier, Tier::D);
    }

    #[test]
    fn category_weight_scales_the_total_only() {
        let mut rule = fixture_rule();
        rule.categories
            .get_mut(columns::CATEGORY_LIVER)
            .expect("liver")
            .weight = 2.0;
        let weighted = score_record(&healthy(), &rule).expect("score");
        let plain = score_record(&healthy(), &fixture_rule()).expect("score");
        assert_eq!(weighted.liver.score, plain.liver.score);
        assert_eq!(
            weighted.total_score,
            plain.total_score + plain.liver.score
        );
    }

    #[test]
    fn malformed_rule_is_a_configuration_error() {
        let mut rule = fixture_rule();
        rule.categories.remove(columns::CATEGORY_BLOOD_SUGAR);
        let err = score_record(&healthy(), &rule).expect_err("must refuse");
        assert!(matches!(err, ScoreError::MissingConfiguration(_)));
    }

    #[test]
    fn total_normalization_defaults_absent_and_non_finite_to_zero() {
        assert_eq!(normalize_total(None), 0.0);
        assert_eq!(normalize_total(Some(f64::NAN)), 0.0);
        assert_eq!(normalize_total(Some(f64::INFINITY)), 0.0);
        assert_eq!(normalize_total(Some(73.5)), 73.5);
    }
}
