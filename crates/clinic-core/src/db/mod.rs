//! Database layer for clinic records.

mod consultations;
mod order;
mod patients;
mod repository;
mod schema;

pub use order::*;
pub use repository::*;
pub use schema::*;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Database errors.
///
/// Raw `rusqlite` errors never leave this module; they are flattened into
/// [`DbError::Storage`] carrying the underlying message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        DbError::Storage(e.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Shared handle to a single SQLite connection.
///
/// Every repository operation holds the connection guard for one unit of
/// work; the guard is released when it goes out of scope, on error paths
/// included.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), "opened clinic database");
        Self::initialize(conn)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the connection for one unit of work.
    pub fn connection(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::Storage(format!("Connection lock poisoned: {}", e)))
    }
}
