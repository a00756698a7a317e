//! SQLite store shared by the harvest and enrichment loops.
//!
//! Raw payload tables are append-only and written with insert-or-ignore.
//! Derived tables get plain inserts, each inside its own scoped transaction
//! that rolls back when dropped uncommitted.
use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use thiserror::Error;

use crate::persist::{ensure_parent_dir, PersistError};

mod cities;
mod comments;
mod geocode;
mod ner;
mod schema;

pub use cities::City;

/// Default store location, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "data/full.db";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store location: {0}")]
    Location(#[from] PersistError),
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let _mode: String = conn.query_row("pragma journal_mode = wal", [], |row| row.get(0))?;
        Self::bootstrap(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(schema::SCHEMA)?;
        Ok(Self { conn })
    }
}
