//! Infrastructure layer for botrent.
//!
//! Contains implementations of the `TrialStore` port defined in
//! `botrent-core` (a JSON key-value file and a SQLite key-value table),
//! data directory resolution, and `config.toml` loading.

pub mod config;
pub mod filesystem;
pub mod sqlite;
pub mod store;
