//! Periodic status recomputation.
//!
//! The sweeper is the only thing that flips `active -> expired` between
//! explicit activate/deactivate calls. It is owned by whoever owns the
//! tracker and must be stopped when that scope tears down.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::clock::Clock;
use super::store::TrialStore;
use super::tracker::TrialTracker;

/// Shortest interval the sweeper runs at; shorter requests are raised to it.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a running sweeper task.
///
/// [`stop`](Self::stop) cancels and waits for the task. Dropping the handle
/// cancels without waiting.
#[derive(Debug)]
pub struct SweeperHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Cancel the sweeper and wait until its task has exited.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "Trial sweeper task ended abnormally");
            }
        }
    }

    /// Whether the sweeper task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Token that stops the sweeper when cancelled, for wiring into a
    /// wider shutdown.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn a task that sweeps `tracker` every `interval`.
///
/// The first sweep happens one full interval after spawning; the startup
/// sweep already ran inside [`TrialTracker::open`]. An `interval` below
/// [`MIN_SWEEP_INTERVAL`] (including zero) is raised to it.
pub fn spawn_sweeper<S, C>(tracker: Arc<TrialTracker<S, C>>, interval: Duration) -> SweeperHandle
where
    S: TrialStore + 'static,
    C: Clock + 'static,
{
    let interval = interval.max(MIN_SWEEP_INTERVAL);
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        tracing::debug!(interval_secs = interval.as_secs(), "Trial sweeper started");
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    tracker.sweep().await;
                }
            }
        }
        tracing::debug!("Trial sweeper stopped");
    });

    SweeperHandle {
        cancel,
        task: Some(task),
    }
}
