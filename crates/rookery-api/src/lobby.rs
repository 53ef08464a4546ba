//! Session orchestration: the operations the HTTP layer exposes.
//!
//! Every operation is a short synchronous unit of work. Normal operations
//! hold the shared side of a reset gate; [`Lobby::reset_all`] holds the
//! exclusive side, so a reset never lands in the middle of a register or a
//! join.
//!
//! Table lifecycle:
//!
//! ```text
//! create_table ──→ [both seats open] ──join──→ [one seat] ──join──→ [full]
//! ```

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rookery_db::Backends;
use rookery_types::{AuthData, Color, LobbyError, Result, RulesEngine, Table, TableId, User, require};
use tracing::{error, info, warn};

use crate::credentials::CredentialStore;
use crate::password::PasswordScheme;
use crate::registry::GameRegistry;
use crate::tokens::TokenStore;

pub struct Lobby {
    credentials: CredentialStore,
    tokens: TokenStore,
    registry: GameRegistry,
    reset_gate: RwLock<()>,
}

impl Lobby {
    pub fn new(backends: Backends, engine: Arc<dyn RulesEngine>, scheme: PasswordScheme) -> Self {
        Self {
            credentials: CredentialStore::new(backends.users, scheme),
            tokens: TokenStore::new(backends.tokens),
            registry: GameRegistry::new(backends.tables, engine),
            reset_gate: RwLock::new(()),
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    pub fn register(&self, username: &str, password: &str, email: &str) -> Result<AuthData> {
        require(username, "username")?;
        require(password, "password")?;
        require(email, "email")?;

        let _gate = self.shared()?;
        if self.credentials.get(username)?.is_some() {
            return Err(LobbyError::AlreadyExists(username.to_string()));
        }

        // A concurrent registration of the same name can still win here; the
        // backend insert is atomic and reports AlreadyExists to the loser.
        self.credentials.create(&User {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        })?;

        // No token, no user: the name must stay free for a retry.
        let auth = match self.tokens.issue(username) {
            Ok(auth) => auth,
            Err(e) => {
                warn!(%username, "Token issue failed after registration: {}", e);
                if let Err(undo) = self.credentials.remove(username) {
                    error!(%username, "Could not roll back registration: {}", undo);
                }
                return Err(e);
            }
        };

        info!(%username, "User registered");
        Ok(auth)
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AuthData> {
        require(username, "username")?;
        require(password, "password")?;

        let _gate = self.shared()?;
        let user = self.credentials.get(username)?;
        match user {
            Some(user) if self.credentials.verify(&user, password) => {
                info!(%username, "User logged in");
                self.tokens.issue(username)
            }
            _ => {
                warn!(%username, "Login rejected");
                Err(LobbyError::Unauthorized)
            }
        }
    }

    pub fn logout(&self, token: &str) -> Result<()> {
        let _gate = self.shared()?;
        let username = self.tokens.validate(token)?;
        self.tokens.revoke(token)?;

        info!(%username, "User logged out");
        Ok(())
    }

    pub fn list_tables(&self, token: &str) -> Result<Vec<Table>> {
        let _gate = self.shared()?;
        self.tokens.validate(token)?;
        self.registry.list()
    }

    pub fn create_table(&self, token: &str, name: &str) -> Result<TableId> {
        let _gate = self.shared()?;
        self.tokens.validate(token)?;
        Ok(self.registry.create(name)?.id)
    }

    pub fn join_table(&self, token: &str, id: TableId, color: &str) -> Result<()> {
        let _gate = self.shared()?;
        let username = self.tokens.validate(token)?;
        let color: Color = color.parse()?;

        let table = self.registry.get(id)?;
        if table.seat(color).is_some() {
            return Err(LobbyError::AlreadyTaken(color));
        }

        // The read above is only a fast path; the claim re-checks atomically.
        self.registry.claim_seat(id, color, &username)?;
        Ok(())
    }

    /// Returns the lobby to its initial empty state. Needs no token.
    pub fn reset_all(&self) -> Result<()> {
        let _gate = self.exclusive()?;
        self.tokens.clear()?;
        self.registry.clear()?;
        self.credentials.clear()?;

        info!("Lobby reset");
        Ok(())
    }

    fn shared(&self) -> Result<RwLockReadGuard<'_, ()>> {
        self.reset_gate.read().map_err(|e| {
            error!("Reset gate poisoned: {}", e);
            LobbyError::unavailable("lobby lock poisoned")
        })
    }

    fn exclusive(&self) -> Result<RwLockWriteGuard<'_, ()>> {
        self.reset_gate.write().map_err(|e| {
            error!("Reset gate poisoned: {}", e);
            LobbyError::unavailable("lobby lock poisoned")
        })
    }
}
