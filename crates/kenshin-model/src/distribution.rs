// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Fixed histogram ranges for the dashboard distribution view.
pub const BUCKET_LABELS: [&str; 5] = ["0-49", "50-99", "100-149", "150-199", "200+"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionBucket {
    pub range: String,
    pub count: u64,
}

/// Five-bucket total-score histogram, recomputed on demand and never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreDistribution {
    counts: [u64; 5],
}

impl ScoreDistribution {
    #[must_use]
    pub fn from_scores(scores: &[f64]) -> Self {
        let mut dist = Self::default();
        for score in scores {
            dist.record(*score);
        }
        dist
    }

    /// Bucket assignment. Scores below 50 (including negatives) land in
    /// `0-49`, 200 and above in `200+`.
    #[must_use]
    pub fn bucket_index(score: f64) -> usize {
        if score < 50.0 {
            0
        } else if score < 100.0 {
            1
        } else if score < 150.0 {
            2
        } else if score < 200.0 {
            3
        } else {
            4
        }
    }

    pub fn record(&mut self, score: f64) {
        self.counts[Self::bucket_index(score)] += 1;
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    #[must_use]
    pub fn count_for(&self, label: &str) -> Option<u64> {
        BUCKET_LABELS
            .iter()
            .position(|l| *l == label)
            .map(|i| self.counts[i])
    }

    #[must_use]
    pub fn buckets(&self) -> Vec<DistributionBucket> {
        BUCKET_LABELS
            .iter()
            .zip(self.counts.iter())
            .map(|(label, count)| DistributionBucket {
                range: (*label).to_string(),
                count: *count,
            })
            .collect()
    }
}
