use std::str::FromStr;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand_core::OsRng;
use rookery_types::{LobbyError, Result};
use tracing::{error, warn};

/// How credentials are written to the user store.
///
/// Both schemes give the same login outcome for the same inputs; they differ
/// only in what a reader of the store would see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordScheme {
    /// Salted Argon2id PHC string.
    #[default]
    Argon2,
    /// The password as given.
    Plaintext,
}

impl PasswordScheme {
    pub fn hash(&self, password: &str) -> Result<String> {
        match self {
            Self::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| {
                        error!("Password hashing failed: {}", e);
                        LobbyError::unavailable("password hashing failed")
                    })
            }
            Self::Plaintext => Ok(password.to_string()),
        }
    }

    pub fn verify(&self, password: &str, stored: &str) -> bool {
        match self {
            Self::Argon2 => {
                let Ok(parsed) = PasswordHash::new(stored) else {
                    warn!("Stored credential is not a valid Argon2 hash");
                    return false;
                };
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            }
            Self::Plaintext => password == stored,
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = LobbyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "argon2" => Ok(Self::Argon2),
            "plaintext" | "plain" => Ok(Self::Plaintext),
            other => Err(LobbyError::invalid(format!("unknown password scheme '{other}'"))),
        }
    }
}
