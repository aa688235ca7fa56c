//! The trial activation collection and its state transitions.
//!
//! `TrialLedger` is plain synchronous data: every operation takes the
//! current time explicitly, so the rules can be exercised without a runtime,
//! a store, or a real clock. [`TrialTracker`](super::TrialTracker) wraps it
//! with locking, persistence, and a clock.

use chrono::{DateTime, Utc};

use botrent_types::trial::{BotId, TrialActivation, TrialStatus};

/// Ordered collection holding at most one activation per bot.
///
/// Records keep the order in which their bot was first activated;
/// re-activating a bot updates its record in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrialLedger {
    records: Vec<TrialActivation>,
}

impl TrialLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from persisted records.
    ///
    /// Duplicate bot ids collapse into one record: the last occurrence wins
    /// and takes the position of the first.
    pub fn from_records(records: impl IntoIterator<Item = TrialActivation>) -> Self {
        let mut ledger = Self::new();
        for record in records {
            match ledger.position(record.bot_id) {
                Some(idx) => ledger.records[idx] = record,
                None => ledger.records.push(record),
            }
        }
        ledger
    }

    fn position(&self, bot_id: BotId) -> Option<usize> {
        self.records.iter().position(|r| r.bot_id == bot_id)
    }

    /// Start (or restart) a trial epoch for `bot_id` at `now`.
    ///
    /// Overwrites the stored name, both timestamps and the status.
    pub fn activate(
        &mut self,
        bot_id: BotId,
        bot_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> &TrialActivation {
        let fresh = TrialActivation::start(bot_id, bot_name, now);
        let idx = match self.position(bot_id) {
            Some(idx) => {
                self.records[idx] = fresh;
                idx
            }
            None => {
                self.records.push(fresh);
                self.records.len() - 1
            }
        };
        &self.records[idx]
    }

    /// Remove the record for `bot_id`. Returns whether one was present.
    pub fn deactivate(&mut self, bot_id: BotId) -> bool {
        match self.position(bot_id) {
            Some(idx) => {
                self.records.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Recompute cached statuses against `now`.
    ///
    /// Only `active -> expired` transitions happen here; an expired record
    /// comes back only through [`activate`](Self::activate). Returns the
    /// number of records that changed.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let mut transitions = 0;
        for record in &mut self.records {
            if record.status == TrialStatus::Active && record.status_at(now) == TrialStatus::Expired {
                record.status = TrialStatus::Expired;
                transitions += 1;
            }
        }
        transitions
    }

    pub fn get(&self, bot_id: BotId) -> Option<&TrialActivation> {
        self.records.iter().find(|r| r.bot_id == bot_id)
    }

    /// Cached status check, no time comparison.
    pub fn is_active(&self, bot_id: BotId) -> bool {
        self.get(bot_id).is_some_and(TrialActivation::is_active)
    }

    pub fn records(&self) -> &[TrialActivation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records whose cached status is `active`.
    pub fn active_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_active()).count()
    }
}
