//! Contracts every storage backend fulfils.
//!
//! Each mutating method is atomic with respect to the others on the same
//! backend. Callers compose them without knowing which backend is behind the
//! trait object.

use std::path::PathBuf;
use std::sync::Arc;

use rookery_types::{AuthData, Color, Result, RulesState, Table, TableId, User};

use crate::{Database, MemoryStore};

pub trait UserBackend: Send + Sync {
    /// Fails with `AlreadyExists` when the username is already stored.
    fn insert_user(&self, user: &User) -> Result<()>;

    fn get_user(&self, username: &str) -> Result<Option<User>>;

    /// Removes one user and their tokens. Returns `false` when absent.
    fn delete_user(&self, username: &str) -> Result<bool>;

    /// Removes every user. Tokens owned by those users go with them.
    fn clear_users(&self) -> Result<()>;
}

pub trait TokenBackend: Send + Sync {
    /// Fails with `AlreadyExists` on a duplicate token value and with
    /// `InvalidArgument` when the owner is not a stored user.
    fn insert_token(&self, auth: &AuthData) -> Result<()>;

    fn get_token(&self, token: &str) -> Result<Option<AuthData>>;

    /// Returns `false` when there was nothing to delete.
    fn delete_token(&self, token: &str) -> Result<bool>;

    fn clear_tokens(&self) -> Result<()>;
}

pub trait TableBackend: Send + Sync {
    /// Stores a table with open seats under the next id.
    fn insert_table(&self, name: &str, rules: &RulesState) -> Result<Table>;

    fn get_table(&self, id: TableId) -> Result<Option<Table>>;

    /// All tables, ascending by id.
    fn list_tables(&self) -> Result<Vec<Table>>;

    /// Replaces the stored record. Returns `false` when the id is unknown.
    fn update_table(&self, table: &Table) -> Result<bool>;

    /// Compare-and-set on one seat: succeeds only if the seat is still empty.
    /// Fails with `NotFound` or `AlreadyTaken`; returns the updated table.
    fn claim_seat(&self, id: TableId, color: Color, username: &str) -> Result<Table>;

    /// Removes every table and restarts id numbering at 1.
    fn clear_tables(&self) -> Result<()>;
}

/// Which medium backs the stores, chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    Sqlite { path: PathBuf },
}

/// One handle per store contract, all pointing at the same medium.
#[derive(Clone)]
pub struct Backends {
    pub users: Arc<dyn UserBackend>,
    pub tokens: Arc<dyn TokenBackend>,
    pub tables: Arc<dyn TableBackend>,
}

impl Backends {
    pub fn open(config: &StorageConfig) -> Result<Self> {
        match config {
            StorageConfig::Memory => Ok(Self::memory()),
            StorageConfig::Sqlite { path } => Ok(Self::sqlite(Database::open(path)?)),
        }
    }

    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            tokens: store.clone(),
            tables: store,
        }
    }

    pub fn sqlite(db: Database) -> Self {
        let db = Arc::new(db);
        Self {
            users: db.clone(),
            tokens: db.clone(),
            tables: db,
        }
    }
}
