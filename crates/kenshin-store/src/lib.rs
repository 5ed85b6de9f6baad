// SPDX-License-Identifier: Apache-2.0

//! Persistence gateway. Owns no business logic: every method is one CRUD
//! round-trip against the relational store. Multi-step flows (the
//! extractor's delete-then-insert pair) are NOT atomic across calls; a
//! failure between two calls is the caller's documented gap.

#![forbid(unsafe_code)]

mod sqlite;

use kenshin_model::{ExtractedEntry, ScoredRecord, Setting};
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub use sqlite::SqliteStore;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// A record for this owner and subject already exists.
    Duplicate,
    Db(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate => f.write_str("record already exists for this subject"),
            Self::Db(msg) => write!(f, "store operation failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Gateway trait over the hosted relational store. Implementations must be
/// safe to call from blocking worker threads; handlers hold it as
/// `Arc<dyn HealthStore>`.
pub trait HealthStore: Send + Sync {
    /// Create tables if absent. Called once at startup, before readiness.
    fn ensure_schema(&self) -> Result<(), StoreError>;

    fn insert_scored(&self, record: &ScoredRecord) -> Result<i64, StoreError>;
    fn query_all_scored(&self) -> Result<Vec<ScoredRecord>, StoreError>;
    fn query_scored_by_subject(
        &self,
        subject_id: &str,
    ) -> Result<Option<ScoredRecord>, StoreError>;
    /// Total-score projection for aggregation. A stored value that cannot be
    /// read as a number fails the whole call; the aggregate view is strict
    /// all-or-nothing, unlike upload validation.
    fn query_total_scores(&self) -> Result<Vec<f64>, StoreError>;

    fn upsert_setting(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError>;
    fn get_setting(&self, key: &str) -> Result<Option<Setting>, StoreError>;
    fn list_settings_with_prefix(&self, prefix: &str) -> Result<Vec<Setting>, StoreError>;

    fn delete_all_extracted(&self) -> Result<(), StoreError>;
    fn insert_extracted(&self, entries: &[ExtractedEntry]) -> Result<(), StoreError>;
    fn list_extracted(&self) -> Result<Vec<ExtractedEntry>, StoreError>;

    fn append_log(&self, level: &str, message: &str) -> Result<(), StoreError>;

    fn upsert_user(&self, username: &str, password: &str) -> Result<(), StoreError>;
    fn user_exists(&self, username: &str) -> Result<bool, StoreError>;
    /// Plaintext credential comparison, preserved from the source system.
    /// Unsafe by modern standards; flagged, not fixed here.
    fn verify_user(&self, username: &str, password: &str) -> Result<bool, StoreError>;
}

/// Server-assigned timestamp for created_at/updated_at columns.
#[must_use]
pub fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64)
}
