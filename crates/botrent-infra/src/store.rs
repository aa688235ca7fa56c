//! Store selection.
//!
//! `TrialStore` uses RPITIT and is not object safe, so the backend picked
//! from `config.toml` at runtime is wrapped in an enum instead of a box.
//! Opening a store also takes the data directory lock, so a second process
//! (for example the CLI while `botrent serve` runs) cannot open a competing
//! tracker over the same stored value.

use std::path::Path;

use botrent_core::trial::TrialStore;
use botrent_types::config::{StorageBackend, TrackerConfig};
use botrent_types::error::RepositoryError;
use botrent_types::trial::TrialActivation;
use chrono::{DateTime, Utc};

use crate::filesystem::{DataDirLock, JsonFileTrialStore};
use crate::sqlite::kv::SqliteTrialStore;
use crate::sqlite::pool::{DatabasePool, database_url};

enum Backend {
    Json(JsonFileTrialStore),
    Sqlite(SqliteTrialStore),
}

/// The trial store chosen by configuration, holding the data directory lock
/// for as long as it lives.
pub struct ConfiguredTrialStore {
    backend: Backend,
    _lock: DataDirLock,
}

impl ConfiguredTrialStore {
    /// Lock `data_dir` and open the backend named in `config` inside it.
    ///
    /// Fails with [`RepositoryError::Locked`] when another owner holds the
    /// directory, or when the SQLite backend cannot connect or migrate.
    pub async fn open(config: &TrackerConfig, data_dir: &Path) -> Result<Self, RepositoryError> {
        let lock = DataDirLock::acquire(data_dir).await?;

        let backend = match config.storage {
            StorageBackend::Json => Backend::Json(JsonFileTrialStore::in_data_dir(
                data_dir,
                config.storage_key.clone(),
            )),
            StorageBackend::Sqlite => {
                let pool = DatabasePool::new(&database_url(data_dir))
                    .await
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Backend::Sqlite(SqliteTrialStore::new(pool, config.storage_key.clone()))
            }
        };

        Ok(Self {
            backend,
            _lock: lock,
        })
    }

    pub fn backend(&self) -> StorageBackend {
        match self.backend {
            Backend::Json(_) => StorageBackend::Json,
            Backend::Sqlite(_) => StorageBackend::Sqlite,
        }
    }

    /// When the collection was last written, `None` if it never was.
    ///
    /// For the JSON backend this is the document's modification time, which
    /// also moves when other keys in the file change.
    pub async fn last_saved(&self) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        match &self.backend {
            Backend::Json(store) => match tokio::fs::metadata(store.path()).await {
                Ok(meta) => Ok(Some(DateTime::<Utc>::from(meta.modified()?))),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            },
            Backend::Sqlite(store) => store.updated_at().await,
        }
    }
}

impl TrialStore for ConfiguredTrialStore {
    async fn load(&self) -> Result<Option<Vec<TrialActivation>>, RepositoryError> {
        match &self.backend {
            Backend::Json(store) => store.load().await,
            Backend::Sqlite(store) => store.load().await,
        }
    }

    async fn save(&self, records: &[TrialActivation]) -> Result<(), RepositoryError> {
        match &self.backend {
            Backend::Json(store) => store.save(records).await,
            Backend::Sqlite(store) => store.save(records).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use botrent_core::trial::{ManualClock, TrialTracker};
    use botrent_types::trial::BotId;
    use chrono::TimeDelta;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_opens_json_by_default() {
        let dir = tempdir().unwrap();
        let store = ConfiguredTrialStore::open(&TrackerConfig::default(), dir.path())
            .await
            .unwrap();
        assert_eq!(store.backend(), StorageBackend::Json);
        assert!(store.last_saved().await.unwrap().is_none());

        store
            .save(&[TrialActivation::start(BotId(1), "Bot", Utc::now())])
            .await
            .unwrap();
        assert!(dir.path().join("storage.json").exists());
        assert!(store.last_saved().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_opens_sqlite_when_configured() {
        let dir = tempdir().unwrap();
        let config = TrackerConfig {
            storage: StorageBackend::Sqlite,
            ..TrackerConfig::default()
        };
        let store = ConfiguredTrialStore::open(&config, dir.path()).await.unwrap();
        assert_eq!(store.backend(), StorageBackend::Sqlite);
        assert!(store.last_saved().await.unwrap().is_none());

        store
            .save(&[TrialActivation::start(BotId(2), "Bot", Utc::now())])
            .await
            .unwrap();
        assert_eq!(store.load().await.unwrap().unwrap()[0].bot_id, BotId(2));
        assert!(dir.path().join("botrent.db").exists());
        assert!(store.last_saved().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_second_tracker_on_same_data_dir_is_refused() {
        let dir = tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let config = TrackerConfig::default();

        let store = ConfiguredTrialStore::open(&config, dir.path()).await.unwrap();
        let owner = TrialTracker::open(store, Arc::clone(&clock)).await;
        owner.activate(BotId(2), "Owner").await;

        // A second opener would overwrite the owner's writes with its own
        // copy of the collection.
        let second = ConfiguredTrialStore::open(&config, dir.path()).await;
        assert!(matches!(second, Err(RepositoryError::Locked(_))));

        let sqlite = TrackerConfig {
            storage: StorageBackend::Sqlite,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            ConfiguredTrialStore::open(&sqlite, dir.path()).await,
            Err(RepositoryError::Locked(_))
        ));

        owner.activate(BotId(1), "Other").await;
        drop(owner);

        let store = ConfiguredTrialStore::open(&config, dir.path()).await.unwrap();
        let reopened = TrialTracker::open(store, Arc::clone(&clock)).await;
        let ids: Vec<_> = reopened.list().await.iter().map(|t| t.bot_id).collect();
        assert_eq!(ids, vec![BotId(2), BotId(1)]);
    }

    #[tokio::test]
    async fn test_tracker_state_survives_restart_on_disk() {
        let dir = tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let config = TrackerConfig::default();

        {
            let store = ConfiguredTrialStore::open(&config, dir.path()).await.unwrap();
            let tracker = TrialTracker::open(store, Arc::clone(&clock)).await;
            tracker.activate(BotId(1), "One").await;
            tracker.activate(BotId(2), "Two").await;
        }

        clock.advance(TimeDelta::days(2));
        let store = ConfiguredTrialStore::open(&config, dir.path()).await.unwrap();
        let tracker = TrialTracker::open(store, Arc::clone(&clock)).await;
        assert!(tracker.is_active(BotId(1)).await);
        assert!(tracker.is_active(BotId(2)).await);

        // Past expiry at the next start: corrected before any query.
        clock.advance(TimeDelta::days(2));
        drop(tracker);
        let store = ConfiguredTrialStore::open(&config, dir.path()).await.unwrap();
        let tracker = TrialTracker::open(store, Arc::clone(&clock)).await;
        assert!(!tracker.is_active(BotId(1)).await);
        assert_eq!(tracker.list().await.len(), 2);
    }
}
