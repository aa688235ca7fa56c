//! Bot trial activation tracking.
//!
//! - [`ledger`]: the synchronous state machine over the activation collection
//! - [`store`]: persistence port plus an in-memory implementation
//! - [`clock`]: wall-clock port
//! - [`tracker`]: the async service embedding code talks to
//! - [`sweeper`]: cancelable periodic status recomputation

pub mod clock;
pub mod ledger;
pub mod store;
pub mod sweeper;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ledger::TrialLedger;
pub use store::{InMemoryTrialStore, TrialStore};
pub use sweeper::{MIN_SWEEP_INTERVAL, SweeperHandle, spawn_sweeper};
pub use tracker::TrialTracker;
