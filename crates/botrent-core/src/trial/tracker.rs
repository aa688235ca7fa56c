//! Trial lifecycle tracker service.
//!
//! Owns the authoritative activation collection for one user/session scope,
//! loads it on open, persists it after every mutation, and exposes the
//! activate/deactivate/query operations collaborators call.

use tokio::sync::Mutex;

use botrent_types::trial::{BotId, TrialActivation};

use super::clock::{Clock, SystemClock};
use super::ledger::TrialLedger;
use super::store::TrialStore;

/// Service owning the trial collection.
///
/// Generic over the persistence strategy and the clock so it can run
/// against a file, a database, or an in-memory fake. A single lock guards
/// the collection; each mutation holds it through the save, so persisted
/// state follows call order and a sweep never interleaves with an
/// activate or deactivate.
///
/// Query results are clones; callers never hold references into the
/// collection.
pub struct TrialTracker<S: TrialStore, C: Clock = SystemClock> {
    ledger: Mutex<TrialLedger>,
    store: S,
    clock: C,
}

impl<S: TrialStore, C: Clock> TrialTracker<S, C> {
    /// Load the persisted collection and run the startup sweep.
    ///
    /// A missing or unreadable value yields an empty collection. Records
    /// that expired while nothing was running are flipped to `expired`
    /// before the tracker is returned.
    pub async fn open(store: S, clock: C) -> Self {
        let records = match store.load().await {
            Ok(Some(records)) => records,
            Ok(None) => {
                tracing::debug!("No persisted trials, starting empty");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load persisted trials, starting empty");
                Vec::new()
            }
        };

        let mut ledger = TrialLedger::from_records(records);
        let transitions = ledger.sweep(clock.now());

        let tracker = Self {
            ledger: Mutex::new(TrialLedger::new()),
            store,
            clock,
        };

        if transitions > 0 {
            tracing::info!(transitions, "Startup sweep expired trials");
            tracker.persist(&ledger).await;
        }
        tracing::debug!(trials = ledger.len(), "Trial tracker opened");

        *tracker.ledger.lock().await = ledger;
        tracker
    }

    /// Start or restart a trial for `bot_id` now.
    ///
    /// Never fails; persistence errors are logged and the in-memory record
    /// stays. Returns a copy of the new record.
    pub async fn activate(&self, bot_id: BotId, bot_name: impl Into<String>) -> TrialActivation {
        let mut ledger = self.ledger.lock().await;
        let record = ledger.activate(bot_id, bot_name, self.clock.now()).clone();
        tracing::info!(
            bot_id = %bot_id,
            bot_name = %record.bot_name,
            expires_at = %record.expires_at,
            "Trial activated"
        );
        self.persist(&ledger).await;
        record
    }

    /// Remove the trial for `bot_id`. Absent ids are a no-op.
    ///
    /// Returns whether a record was removed.
    pub async fn deactivate(&self, bot_id: BotId) -> bool {
        let mut ledger = self.ledger.lock().await;
        let removed = ledger.deactivate(bot_id);
        if removed {
            tracing::info!(bot_id = %bot_id, "Trial deactivated");
        } else {
            tracing::debug!(bot_id = %bot_id, "Deactivate for unknown bot, nothing to remove");
        }
        self.persist(&ledger).await;
        removed
    }

    /// Cached status check; staleness is bounded by the sweep interval.
    pub async fn is_active(&self, bot_id: BotId) -> bool {
        self.ledger.lock().await.is_active(bot_id)
    }

    /// Copy of the record for `bot_id`, or `None`.
    pub async fn get_status(&self, bot_id: BotId) -> Option<TrialActivation> {
        self.ledger.lock().await.get(bot_id).cloned()
    }

    /// Copies of every record in activation order.
    pub async fn list(&self) -> Vec<TrialActivation> {
        self.ledger.lock().await.records().to_vec()
    }

    /// Recompute statuses against the clock now.
    ///
    /// Persists only when at least one status changed. Returns the number
    /// of transitions.
    pub async fn sweep(&self) -> usize {
        let mut ledger = self.ledger.lock().await;
        let transitions = ledger.sweep(self.clock.now());
        if transitions > 0 {
            tracing::info!(transitions, "Sweep expired trials");
            self.persist(&ledger).await;
        } else {
            tracing::trace!("Sweep found no transitions");
        }
        transitions
    }

    /// `(total, active)` record counts under one lock.
    pub async fn counts(&self) -> (usize, usize) {
        let ledger = self.ledger.lock().await;
        (ledger.len(), ledger.active_count())
    }

    /// The store this tracker persists to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The clock this tracker measures expiry against.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Best-effort save of the full collection.
    async fn persist(&self, ledger: &TrialLedger) {
        if let Err(err) = self.store.save(ledger.records()).await {
            tracing::warn!(
                error = %err,
                trials = ledger.len(),
                "Failed to persist trials; in-memory state kept"
            );
        }
    }
}
