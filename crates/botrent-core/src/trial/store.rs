//! Trial persistence port.
//!
//! The whole activation collection is stored as one value under one key.
//! Implementations live in botrent-infra; [`InMemoryTrialStore`] lives here
//! because it has no I/O and is what tests (and ephemeral sessions) use.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use botrent_types::error::RepositoryError;
use botrent_types::trial::TrialActivation;

/// Load/save strategy for the activation collection.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait TrialStore: Send + Sync {
    /// Read the persisted collection. `Ok(None)` when nothing was stored yet.
    fn load(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<Vec<TrialActivation>>, RepositoryError>> + Send;

    /// Overwrite the persisted collection with `records`.
    fn save(
        &self,
        records: &[TrialActivation],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

impl<S: TrialStore> TrialStore for Arc<S> {
    fn load(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<Vec<TrialActivation>>, RepositoryError>> + Send
    {
        (**self).load()
    }

    fn save(
        &self,
        records: &[TrialActivation],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send {
        (**self).save(records)
    }
}

/// Process-local store holding the serialized JSON value.
///
/// Keeps the serialized form rather than the records so loading goes
/// through the same decode path as the durable stores.
#[derive(Debug, Default)]
pub struct InMemoryTrialStore {
    raw: Mutex<Option<String>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryTrialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an already-serialized value (possibly garbage).
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
            ..Self::default()
        }
    }

    /// The currently stored value, if any.
    pub fn raw(&self) -> Option<String> {
        self.raw.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make every following `save` fail (simulates a full or disabled store).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl TrialStore for InMemoryTrialStore {
    async fn load(&self) -> Result<Option<Vec<TrialActivation>>, RepositoryError> {
        let raw = self.raw();
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, records: &[TrialActivation]) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Io("storage quota exceeded".to_string()));
        }
        let raw = serde_json::to_string(records)?;
        *self.raw.lock().unwrap_or_else(|e| e.into_inner()) = Some(raw);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
