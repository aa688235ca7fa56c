//! Configuration types for botrent.
//!
//! `TrackerConfig` represents the top-level `config.toml` that controls the
//! sweep cadence and where trial activations are persisted.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::time::Duration;

/// Which persistence medium backs the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `{data_dir}/storage.json`, a JSON object used as a key-value store.
    #[default]
    Json,
    /// `{data_dir}/botrent.db`, a `kv_entries` table.
    Sqlite,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Json => write!(f, "json"),
            StorageBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Top-level configuration, loaded from `~/.botrent/config.toml`.
///
/// All fields have defaults matching the reference behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Seconds between status recomputation sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    #[serde(default)]
    pub storage: StorageBackend,

    /// Key the whole activation collection is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

/// Storage key used by the marketplace frontend.
pub const DEFAULT_STORAGE_KEY: &str = "activeBots";

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl TrackerConfig {
    /// Sweep interval, never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
            storage: StorageBackend::default(),
            storage_key: default_storage_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_config_default_values() {
        let config = TrackerConfig::default();
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.storage, StorageBackend::Json);
        assert_eq!(config.storage_key, "activeBots");
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_tracker_config_deserialize_with_defaults() {
        let config: TrackerConfig = toml::from_str("").unwrap();
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.storage, StorageBackend::Json);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_tracker_config_deserialize_with_values() {
        let toml_str = r#"
sweep_interval_secs = 15
storage = "sqlite"
storage_key = "trials"
"#;
        let config: TrackerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sweep_interval_secs, 15);
        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.storage_key, "trials");
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = TrackerConfig {
            sweep_interval_secs: 0,
            ..TrackerConfig::default()
        };
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result: Result<TrackerConfig, _> = toml::from_str(r#"storage = "redis""#);
        assert!(result.is_err());
    }
}
