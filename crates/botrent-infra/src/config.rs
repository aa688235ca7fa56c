//! Configuration loader for botrent.
//!
//! Reads `config.toml` from the data directory (`~/.botrent/` in production)
//! and deserializes it into [`TrackerConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::Path;

use botrent_types::config::TrackerConfig;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`TrackerConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_tracker_config(data_dir: &Path) -> TrackerConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return TrackerConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return TrackerConfig::default();
        }
    };

    match toml::from_str::<TrackerConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            TrackerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botrent_types::config::StorageBackend;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_tracker_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_tracker_config(tmp.path()).await;
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.storage, StorageBackend::Json);
    }

    #[tokio::test]
    async fn load_tracker_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
sweep_interval_secs = 30
storage = "sqlite"
"#,
        )
        .await
        .unwrap();

        let config = load_tracker_config(tmp.path()).await;
        assert_eq!(config.sweep_interval_secs, 30);
        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.storage_key, "activeBots");
    }

    #[tokio::test]
    async fn load_tracker_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_tracker_config(tmp.path()).await;
        assert_eq!(config.sweep_interval_secs, 60);
    }
}
