//! Trial lifecycle logic and persistence ports for botrent.
//!
//! This crate defines the "ports" (store and clock traits) that the
//! infrastructure layer implements, plus the tracker that owns the trial
//! collection. It depends only on `botrent-types` -- never on
//! `botrent-infra` or any database/IO crate.

pub mod trial;
