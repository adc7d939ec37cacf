//! Persistence layer for fieldlog
//!
//! Session lists are stored as opaque JSON payloads, one per scope key.
//! Provides:
//! - The `Store` trait the session book is built on
//! - SQLite-backed store for the CLI
//! - In-memory store for tests and throwaway runs

mod memory;
mod sqlite;
mod traits;

pub use memory::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
