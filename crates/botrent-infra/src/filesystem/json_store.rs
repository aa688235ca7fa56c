//! JSON file trial store.
//!
//! Treats `{data_dir}/storage.json` as a small key-value store: the file
//! holds one JSON object, and the tracker owns a single key in it
//! (`activeBots` by default). Other keys are left untouched.

use std::path::{Path, PathBuf};

use botrent_core::trial::TrialStore;
use botrent_types::error::RepositoryError;
use botrent_types::trial::TrialActivation;
use serde_json::{Map, Value};

/// File name of the key-value document inside the data directory.
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// `TrialStore` backed by one key of a JSON object file.
pub struct JsonFileTrialStore {
    path: PathBuf,
    key: String,
}

impl JsonFileTrialStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    /// Store at `{data_dir}/storage.json`.
    pub fn in_data_dir(data_dir: &Path, key: impl Into<String>) -> Self {
        Self::new(data_dir.join(STORAGE_FILE_NAME), key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document. `Ok(None)` when the file does not exist.
    async fn read_document(&self) -> Result<Option<Map<String, Value>>, RepositoryError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let document: Map<String, Value> = serde_json::from_str(&content)?;
        Ok(Some(document))
    }

    /// Write via a sibling temp file and rename, so a crash mid-write never
    /// leaves a truncated document behind.
    async fn write_document(&self, document: &Map<String, Value>) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

impl TrialStore for JsonFileTrialStore {
    async fn load(&self) -> Result<Option<Vec<TrialActivation>>, RepositoryError> {
        let Some(mut document) = self.read_document().await? else {
            return Ok(None);
        };
        match document.remove(&self.key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, records: &[TrialActivation]) -> Result<(), RepositoryError> {
        let mut document = match self.read_document().await {
            Ok(document) => document.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "Existing storage document unreadable, rewriting it"
                );
                Map::new()
            }
        };
        document.insert(self.key.clone(), serde_json::to_value(records)?);
        self.write_document(&document).await
    }
}
