//! # bizpulse Database Crate
//!
//! The dashboard's only persistent state: a local key-value store (SQLite via
//! `sqlx`) and the record store built on top of it.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: open the SQLite file and apply the schema.
//! - `KvRepository`: get/put/delete of string values by key.
//! - `RecordStore`: load, upsert and clear the daily records.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod records;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use records::{ClearConfirmation, RecordStore, UpsertOutcome};
pub use repository::KvRepository;
