use std::sync::Arc;

use rookery_db::TokenBackend;
use rookery_types::{AuthData, LobbyError, Result, require};
use tracing::warn;
use uuid::Uuid;

/// The backend rejects duplicate token values; draw again at most this often.
const ISSUE_ATTEMPTS: usize = 3;

/// Opaque bearer tokens mapped to their owner.
pub struct TokenStore {
    backend: Arc<dyn TokenBackend>,
}

impl TokenStore {
    pub fn new(backend: Arc<dyn TokenBackend>) -> Self {
        Self { backend }
    }

    /// Mints a fresh token for `username`. Earlier tokens stay valid.
    pub fn issue(&self, username: &str) -> Result<AuthData> {
        require(username, "username")?;

        for _ in 0..ISSUE_ATTEMPTS {
            let auth = AuthData {
                token: Uuid::new_v4().to_string(),
                username: username.to_string(),
            };
            match self.backend.insert_token(&auth) {
                Ok(()) => return Ok(auth),
                Err(LobbyError::AlreadyExists(_)) => {
                    warn!("Token collision, drawing a new value");
                }
                Err(e) => return Err(e),
            }
        }

        Err(LobbyError::unavailable("could not allocate a unique token"))
    }

    /// The owning username, or `Unauthorized`.
    pub fn validate(&self, token: &str) -> Result<String> {
        if token.is_empty() {
            return Err(LobbyError::Unauthorized);
        }
        self.backend
            .get_token(token)?
            .map(|auth| auth.username)
            .ok_or(LobbyError::Unauthorized)
    }

    pub fn revoke(&self, token: &str) -> Result<()> {
        if self.backend.delete_token(token)? {
            Ok(())
        } else {
            Err(LobbyError::Unauthorized)
        }
    }

    pub fn clear(&self) -> Result<()> {
        self.backend.clear_tokens()
    }
}
