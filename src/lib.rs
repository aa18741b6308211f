//! Spendlog is a library for keeping a personal expense ledger.
//!
//! It provides transaction and user stores (in-memory and SQLite backed),
//! aggregation over transaction snapshots, budget evaluation, savings
//! goals, CSV import/export and keyword based category suggestion.
//!
//! The usual setup is to open a [rusqlite::Connection] and call
//! [stores::sqlite::create_stores], or to use
//! [stores::MemoryTransactionStore] for a session-scoped ledger.

#![warn(missing_docs)]

pub mod aggregation;
pub mod budget;
pub mod categorize;
pub mod csv;
pub mod db;
pub mod models;
pub mod stores;

mod error;

pub use error::Error;
