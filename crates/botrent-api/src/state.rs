//! Application state wiring the tracker together.
//!
//! AppState holds the concrete tracker used by both CLI and REST API.
//! `TrialTracker` is generic over its store and clock; AppState pins it to
//! the store picked by `config.toml` and the system clock.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use botrent_core::trial::{SystemClock, TrialTracker};
use botrent_infra::config::load_tracker_config;
use botrent_infra::filesystem::resolve_data_dir;
use botrent_infra::store::ConfiguredTrialStore;
use botrent_types::config::TrackerConfig;

/// Concrete tracker type pinned to the infra store and the system clock.
pub type ConcreteTrialTracker = TrialTracker<ConfiguredTrialStore>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<ConcreteTrialTracker>,
    pub config: TrackerConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state in the resolved data directory.
    pub async fn init() -> anyhow::Result<Self> {
        Self::open(resolve_data_dir()).await
    }

    /// Load config, open the configured store, and open the tracker
    /// (which runs the startup sweep).
    pub async fn open(data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_tracker_config(&data_dir).await;

        let store = ConfiguredTrialStore::open(&config, &data_dir)
            .await
            .with_context(|| format!("failed to open {} trial store", config.storage))?;

        tracing::debug!(
            data_dir = %data_dir.display(),
            storage = %config.storage,
            "Opening trial tracker"
        );
        let tracker = TrialTracker::open(store, SystemClock).await;

        Ok(Self {
            tracker: Arc::new(tracker),
            config,
            data_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botrent_types::trial::BotId;

    #[tokio::test]
    async fn test_second_open_on_same_data_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let server = AppState::open(dir.path().to_path_buf()).await.unwrap();
        server.tracker.activate(BotId(1), "Served").await;

        let err = AppState::open(dir.path().to_path_buf())
            .await
            .err()
            .expect("data dir should be locked");
        assert!(format!("{err:#}").contains("locked by another botrent process"));

        // The owner's collection is untouched by the refused opener.
        server.tracker.activate(BotId(2), "Also served").await;
        drop(server);

        let reopened = AppState::open(dir.path().to_path_buf()).await.unwrap();
        assert_eq!(reopened.tracker.counts().await, (2, 2));
    }
}
