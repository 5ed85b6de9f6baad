use crate::{unix_millis, HealthStore, StoreError};
use kenshin_model::{ExtractedEntry, Measurements, ScoredRecord, Setting, SubjectId, Tier};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: i64 = 1;

/// SQLite-backed gateway. Opens one connection per operation; there is no
/// pooled or shared connection state between requests.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.path).map_err(|e| StoreError::Db(e.to_string()))
    }
}

fn db_err(e: rusqlite::Error) -> StoreError {
    StoreError::Db(e.to_string())
}

fn scored_from_row(row: &Row<'_>) -> Result<ScoredRecord, rusqlite::Error> {
    let tier = |idx: usize| -> Result<Tier, rusqlite::Error> {
        let raw: String = row.get(idx)?;
        Tier::parse(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
    };
    let subject_raw: String = row.get(0)?;
    let subject_id = SubjectId::parse(&subject_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(ScoredRecord {
        subject_id,
        user_id: row.get(1)?,
        measurements: Measurements {
            bmi: row.get(2)?,
            s_bp: row.get(3)?,
            d_bp: row.get(4)?,
            bs: row.get(5)?,
            hba1c: row.get(6)?,
            ldl: row.get(7)?,
            tg: row.get(8)?,
            ast: row.get(9)?,
            alt: row.get(10)?,
            gtp: row.get(11)?,
        },
        bmi_score: row.get(12)?,
        blood_pressure_score: row.get(13)?,
        blood_sugar_score: row.get(14)?,
        lipid_score: row.get(15)?,
        liver_score: row.get(16)?,
        total_score: row.get(17)?,
        bmi_tier: tier(18)?,
        blood_pressure_tier: tier(19)?,
        blood_sugar_tier: tier(20)?,
        lipid_tier: tier(21)?,
        liver_tier: tier(22)?,
        created_at: row.get(23)?,
        updated_at: row.get(24)?,
    })
}

const SCORED_COLUMNS: &str = "subject_id, user_id, bmi, s_bp, d_bp, bs, hba1c, ldl, tg, ast, alt, gtp, \
     bmi_score, blood_pressure_score, blood_sugar_score, lipid_score, liver_score, total_score, \
     bmi_tier, blood_pressure_tier, blood_sugar_tier, lipid_tier, liver_tier, created_at, updated_at";

impl HealthStore for SqliteStore {
    fn ensure_schema(&self) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS health_check_results (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              subject_id TEXT NOT NULL,
              user_id TEXT NOT NULL,
              bmi REAL NOT NULL,
              s_bp REAL NOT NULL,
              d_bp REAL NOT NULL,
              bs REAL NOT NULL,
              hba1c REAL NOT NULL,
              ldl REAL NOT NULL,
              tg REAL NOT NULL,
              ast REAL NOT NULL,
              alt REAL NOT NULL,
              gtp REAL NOT NULL,
              bmi_score REAL NOT NULL,
              blood_pressure_score REAL NOT NULL,
              blood_sugar_score REAL NOT NULL,
              lipid_score REAL NOT NULL,
              liver_score REAL NOT NULL,
              total_score REAL NOT NULL,
              bmi_tier TEXT NOT NULL,
              blood_pressure_tier TEXT NOT NULL,
              blood_sugar_tier TEXT NOT NULL,
              lipid_tier TEXT NOT NULL,
              liver_tier TEXT NOT NULL,
              created_at INTEGER NOT NULL,
              updated_at INTEGER NOT NULL,
              UNIQUE (user_id, subject_id)
            );
            CREATE INDEX IF NOT EXISTS idx_results_total_score
              ON health_check_results(total_score);
            CREATE TABLE IF NOT EXISTS settings (
              k TEXT PRIMARY KEY,
              v TEXT NOT NULL,
              updated_at INTEGER NOT NULL
            ) WITHOUT ROWID;
            CREATE TABLE IF NOT EXISTS extracted_ids (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              subject_id TEXT NOT NULL,
              total_score REAL NOT NULL
            );
            CREATE TABLE IF NOT EXISTS logs (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              level TEXT NOT NULL,
              message TEXT NOT NULL,
              created_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS users (
              username TEXT PRIMARY KEY,
              password TEXT NOT NULL
            ) WITHOUT ROWID;
            ",
        )
        .map_err(db_err)?;
        conn.execute_batch(&format!("PRAGMA user_version={SCHEMA_VERSION};"))
            .map_err(db_err)
    }

    fn insert_scored(&self, record: &ScoredRecord) -> Result<i64, StoreError> {
        let conn = self.open()?;
        let m = &record.measurements;
        let result = conn.execute(
            &format!(
                "INSERT INTO health_check_results ({SCORED_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
                 ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25)"
            ),
            params![
                record.subject_id.as_str(),
                record.user_id,
                m.bmi,
                m.s_bp,
                m.d_bp,
                m.bs,
                m.hba1c,
                m.ldl,
                m.tg,
                m.ast,
                m.alt,
                m.gtp,
                record.bmi_score,
                record.blood_pressure_score,
                record.blood_sugar_score,
                record.lipid_score,
                record.liver_score,
                record.total_score,
                record.bmi_tier.as_str(),
                record.blood_pressure_tier.as_str(),
                record.blood_sugar_tier.as_str(),
                record.lipid_tier.as_str(),
                record.liver_tier.as_str(),
                record.created_at,
                record.updated_at,
            ],
        );
        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(e) if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
                Err(StoreError::Duplicate)
            }
            Err(e) => Err(db_err(e)),
        }
    }

    fn query_all_scored(&self) -> Result<Vec<ScoredRecord>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SCORED_COLUMNS} FROM health_check_results ORDER BY id"
            ))
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], scored_from_row)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    fn query_scored_by_subject(
        &self,
        subject_id: &str,
    ) -> Result<Option<ScoredRecord>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SCORED_COLUMNS} FROM health_check_results WHERE subject_id=?1 ORDER BY id LIMIT 1"
            ))
            .map_err(db_err)?;
        let mut rows = stmt
            .query_map(params![subject_id], scored_from_row)
            .map_err(db_err)?;
        match rows.next() {
            Some(row) => Ok(Some(row.map_err(db_err)?)),
            None => Ok(None),
        }
    }

    fn query_total_scores(&self) -> Result<Vec<f64>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare("SELECT total_score FROM health_check_results ORDER BY id")
            .map_err(db_err)?;
        let scores = stmt
            .query_map([], |row| row.get::<_, f64>(0))
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(scores)
    }

    fn upsert_setting(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let conn = self.open()?;
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Db(e.to_string()))?;
        conn.execute(
            "INSERT INTO settings (k, v, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(k) DO UPDATE SET v=excluded.v, updated_at=excluded.updated_at",
            params![key, raw, unix_millis()],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<Option<Setting>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare("SELECT k, v, updated_at FROM settings WHERE k=?1")
            .map_err(db_err)?;
        let mut rows = stmt
            .query_map(params![key], setting_from_row)
            .map_err(db_err)?;
        match rows.next() {
            Some(row) => Ok(Some(row.map_err(db_err)?)),
            None => Ok(None),
        }
    }

    fn list_settings_with_prefix(&self, prefix: &str) -> Result<Vec<Setting>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare("SELECT k, v, updated_at FROM settings WHERE k LIKE ?1 || '%' ORDER BY k")
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![prefix], setting_from_row)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    fn delete_all_extracted(&self) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute("DELETE FROM extracted_ids", []).map_err(db_err)?;
        Ok(())
    }

    fn insert_extracted(&self, entries: &[ExtractedEntry]) -> Result<(), StoreError> {
        let mut conn = self.open()?;
        let tx = conn.transaction().map_err(db_err)?;
        {
            let mut stmt = tx
                .prepare("INSERT INTO extracted_ids (subject_id, total_score) VALUES (?1, ?2)")
                .map_err(db_err)?;
            for entry in entries {
                stmt.execute(params![entry.subject_id, entry.total_score])
                    .map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)
    }

    fn list_extracted(&self) -> Result<Vec<ExtractedEntry>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare("SELECT subject_id, total_score FROM extracted_ids ORDER BY id")
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ExtractedEntry {
                    subject_id: row.get(0)?,
                    total_score: row.get(1)?,
                })
            })
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    fn append_log(&self, level: &str, message: &str) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO logs (level, message, created_at) VALUES (?1, ?2, ?3)",
            params![level, message, unix_millis()],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn upsert_user(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2) \
             ON CONFLICT(username) DO UPDATE SET password=excluded.password",
            params![username, password],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn user_exists(&self, username: &str) -> Result<bool, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare("SELECT 1 FROM users WHERE username=?1")
            .map_err(db_err)?;
        stmt.exists(params![username]).map_err(db_err)
    }

    fn verify_user(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare("SELECT password FROM users WHERE username=?1")
            .map_err(db_err)?;
        let mut rows = stmt
            .query_map(params![username], |row| row.get::<_, String>(0))
            .map_err(db_err)?;
        match rows.next() {
            Some(stored) => Ok(stored.map_err(db_err)? == password),
            None => Ok(false),
        }
    }
}

fn setting_from_row(row: &Row<'_>) -> Result<Setting, rusqlite::Error> {
    let raw: String = row.get(1)?;
    let value = serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Setting {
        key: row.get(0)?,
        value,
        updated_at: row.get(2)?,
    })
}
