//! Filesystem adapters for botrent.
//!
//! Data directory resolution, the data directory lock, and the JSON file
//! trial store.

pub mod json_store;
pub mod lock;

use std::path::PathBuf;

pub use json_store::JsonFileTrialStore;
pub use lock::DataDirLock;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `BOTRENT_DATA_DIR` environment variable
/// 2. `~/.botrent` in the user's home directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BOTRENT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".botrent");
    }

    // Last resort: current directory
    PathBuf::from(".botrent")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_is_not_empty() {
        let dir = resolve_data_dir();
        assert!(!dir.as_os_str().is_empty());
    }
}
