use std::collections::{BTreeMap, HashMap};
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard};

use rookery_types::{AuthData, Color, LobbyError, Result, RulesState, Table, TableId, User};
use tracing::{error, info};

use crate::backend::{TableBackend, TokenBackend, UserBackend};

/// Volatile backend: one mutex per record type, nothing survives a restart.
///
/// Lock order is users → tokens whenever both are held.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, User>>,
    /// token -> username
    tokens: Mutex<HashMap<String, String>>,
    tables: Mutex<TableMap>,
}

#[derive(Default)]
struct TableMap {
    rows: BTreeMap<TableId, Table>,
    last_id: TableId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>> {
    mutex.lock().map_err(|e| {
        error!("{} lock poisoned: {}", what, e);
        LobbyError::unavailable(format!("{what} store lock poisoned"))
    })
}

impl UserBackend for MemoryStore {
    fn insert_user(&self, user: &User) -> Result<()> {
        let mut users = lock(&self.users, "users")?;
        match users.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(LobbyError::AlreadyExists(user.username.clone())),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }

    fn get_user(&self, username: &str) -> Result<Option<User>> {
        Ok(lock(&self.users, "users")?.get(username).cloned())
    }

    fn delete_user(&self, username: &str) -> Result<bool> {
        let mut users = lock(&self.users, "users")?;
        if users.remove(username).is_none() {
            return Ok(false);
        }
        lock(&self.tokens, "tokens")?.retain(|_, owner| owner != username);
        Ok(true)
    }

    fn clear_users(&self) -> Result<()> {
        let mut users = lock(&self.users, "users")?;
        let mut tokens = lock(&self.tokens, "tokens")?;
        tokens.retain(|_, owner| !users.contains_key(owner));
        users.clear();
        Ok(())
    }
}

impl TokenBackend for MemoryStore {
    fn insert_token(&self, auth: &AuthData) -> Result<()> {
        let users = lock(&self.users, "users")?;
        if !users.contains_key(&auth.username) {
            return Err(LobbyError::invalid(format!("no such user '{}'", auth.username)));
        }

        let mut tokens = lock(&self.tokens, "tokens")?;
        match tokens.entry(auth.token.clone()) {
            Entry::Occupied(_) => Err(LobbyError::AlreadyExists("auth token".into())),
            Entry::Vacant(slot) => {
                slot.insert(auth.username.clone());
                Ok(())
            }
        }
    }

    fn get_token(&self, token: &str) -> Result<Option<AuthData>> {
        let tokens = lock(&self.tokens, "tokens")?;
        Ok(tokens.get(token).map(|username| AuthData {
            token: token.to_string(),
            username: username.clone(),
        }))
    }

    fn delete_token(&self, token: &str) -> Result<bool> {
        Ok(lock(&self.tokens, "tokens")?.remove(token).is_some())
    }

    fn clear_tokens(&self) -> Result<()> {
        lock(&self.tokens, "tokens")?.clear();
        Ok(())
    }
}

impl TableBackend for MemoryStore {
    fn insert_table(&self, name: &str, rules: &RulesState) -> Result<Table> {
        let mut tables = lock(&self.tables, "tables")?;
        tables.last_id += 1;
        let table = Table::new(tables.last_id, name, rules.clone());
        tables.rows.insert(table.id, table.clone());
        Ok(table)
    }

    fn get_table(&self, id: TableId) -> Result<Option<Table>> {
        Ok(lock(&self.tables, "tables")?.rows.get(&id).cloned())
    }

    fn list_tables(&self) -> Result<Vec<Table>> {
        Ok(lock(&self.tables, "tables")?.rows.values().cloned().collect())
    }

    fn update_table(&self, table: &Table) -> Result<bool> {
        let mut tables = lock(&self.tables, "tables")?;
        match tables.rows.get_mut(&table.id) {
            Some(stored) => {
                *stored = table.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn claim_seat(&self, id: TableId, color: Color, username: &str) -> Result<Table> {
        let mut tables = lock(&self.tables, "tables")?;
        let table = tables.rows.get_mut(&id).ok_or(LobbyError::NotFound(id))?;
        table.occupy(color, username)?;

        info!(game_id = id, %color, %username, "Seat claimed");
        Ok(table.clone())
    }

    fn clear_tables(&self) -> Result<()> {
        let mut tables = lock(&self.tables, "tables")?;
        tables.rows.clear();
        tables.last_id = 0;
        Ok(())
    }
}
