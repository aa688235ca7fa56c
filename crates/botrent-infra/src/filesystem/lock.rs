//! Exclusive ownership of a data directory.
//!
//! Each tracker keeps the whole collection in memory and overwrites the
//! stored value on every save, so only one process may open the stores in
//! a data directory at a time. The lock is an OS advisory lock on
//! `{data_dir}/botrent.lock`, released when the guard is dropped or the
//! process exits.

use std::fs::{File, TryLockError};
use std::path::{Path, PathBuf};

use botrent_types::error::RepositoryError;

/// File name of the lock file inside the data directory.
pub const LOCK_FILE_NAME: &str = "botrent.lock";

/// Held lock on a data directory.
#[derive(Debug)]
pub struct DataDirLock {
    path: PathBuf,
    _file: File,
}

impl DataDirLock {
    /// Take the lock without waiting.
    ///
    /// Fails with [`RepositoryError::Locked`] when another owner holds it.
    pub async fn acquire(data_dir: &Path) -> Result<Self, RepositoryError> {
        tokio::fs::create_dir_all(data_dir).await?;
        let path = data_dir.join(LOCK_FILE_NAME);

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .await?
            .into_std()
            .await;

        match file.try_lock() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Data directory locked");
                Ok(Self { path, _file: file })
            }
            Err(TryLockError::WouldBlock) => Err(RepositoryError::Locked(path.display().to_string())),
            Err(TryLockError::Error(err)) => Err(err.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_second_acquire_fails_while_held() {
        let dir = tempdir().unwrap();
        let held = DataDirLock::acquire(dir.path()).await.unwrap();
        assert_eq!(held.path(), dir.path().join(LOCK_FILE_NAME));

        let second = DataDirLock::acquire(dir.path()).await;
        assert!(matches!(second, Err(RepositoryError::Locked(_))));
    }

    #[tokio::test]
    async fn test_lock_released_on_drop() {
        let dir = tempdir().unwrap();
        let held = DataDirLock::acquire(dir.path()).await.unwrap();
        drop(held);

        assert!(DataDirLock::acquire(dir.path()).await.is_ok());
    }

    #[tokio::test]
    async fn test_creates_missing_data_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("fresh").join("botrent");
        let lock = DataDirLock::acquire(&nested).await.unwrap();
        assert!(lock.path().exists());
    }
}
