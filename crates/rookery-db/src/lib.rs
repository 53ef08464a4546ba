//! Storage adapter for the lobby: the backend contracts plus two
//! interchangeable implementations, a volatile [`MemoryStore`] and a durable
//! SQLite [`Database`].

pub mod backend;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod queries;

pub use backend::{Backends, StorageConfig, TableBackend, TokenBackend, UserBackend};
pub use memory::MemoryStore;

use rookery_types::{LobbyError, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::{error, info};

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).or_unavailable()?;

        // WAL mode for concurrent readers from other processes
        conn.pragma_update(None, "journal_mode", "WAL").or_unavailable()?;

        let db = Self::init(conn)?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// A private database that disappears with the handle.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().or_unavailable()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON").or_unavailable()?;
        migrations::run(&conn).or_unavailable()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Runs `f` with exclusive use of the connection. Every statement sequence
    /// inside one call is therefore atomic with respect to other callers.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| {
            error!("DB lock poisoned: {}", e);
            LobbyError::unavailable("database lock poisoned")
        })?;
        f(&conn)
    }
}

/// Converts `rusqlite` failures into the lobby taxonomy at the adapter
/// boundary. The backend detail goes to the log, not to the caller.
pub(crate) trait StorageResultExt<T> {
    fn or_unavailable(self) -> Result<T>;
    fn optional(self) -> Result<Option<T>>;
}

impl<T> StorageResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn or_unavailable(self) -> Result<T> {
        self.map_err(storage_error)
    }

    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).or_unavailable(),
        }
    }
}

pub(crate) fn storage_error(e: rusqlite::Error) -> LobbyError {
    error!("SQLite error: {}", e);
    LobbyError::unavailable("database operation failed")
}
