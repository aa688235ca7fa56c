//! SQLite key-value trial store.
//!
//! Implements `TrialStore` from `botrent-core` using sqlx with split
//! read/write pools. The collection is stored as JSON text in one row of
//! `kv_entries` and deserialized on read.

use botrent_core::trial::TrialStore;
use botrent_types::error::RepositoryError;
use botrent_types::trial::TrialActivation;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `TrialStore`.
pub struct SqliteTrialStore {
    pool: DatabasePool,
    key: String,
}

impl SqliteTrialStore {
    /// Create a store that keeps the collection under `key`.
    pub fn new(pool: DatabasePool, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    /// When the entry was last written, if it exists.
    pub async fn updated_at(&self) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        let row = sqlx::query("SELECT updated_at FROM kv_entries WHERE key = ?")
            .bind(&self.key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let raw: String = row
                    .try_get("updated_at")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(parse_datetime(&raw)?))
            }
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// TrialStore implementation
// ---------------------------------------------------------------------------

impl TrialStore for SqliteTrialStore {
    async fn load(&self) -> Result<Option<Vec<TrialActivation>>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM kv_entries WHERE key = ?")
            .bind(&self.key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let value_str: String = row
                    .try_get("value")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let records: Vec<TrialActivation> = serde_json::from_str(&value_str)?;
                Ok(Some(records))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, records: &[TrialActivation]) -> Result<(), RepositoryError> {
        let now = format_datetime(&Utc::now());
        let value_str = serde_json::to_string(records)?;

        sqlx::query(
            r#"INSERT INTO kv_entries (key, value, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(&self.key)
        .bind(&value_str)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}
