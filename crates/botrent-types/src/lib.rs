//! Shared domain types for botrent.
//!
//! This crate contains the domain types used across the workspace: the
//! marketplace bot identifier, trial activation records, configuration and
//! the associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod trial;
