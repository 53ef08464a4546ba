use std::sync::Arc;

use rookery_db::UserBackend;
use rookery_types::{Result, User, require};

use crate::password::PasswordScheme;

/// User identities, unique by username.
pub struct CredentialStore {
    backend: Arc<dyn UserBackend>,
    scheme: PasswordScheme,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn UserBackend>, scheme: PasswordScheme) -> Self {
        Self { backend, scheme }
    }

    /// Stores `user` with its password run through the configured scheme.
    pub fn create(&self, user: &User) -> Result<()> {
        require(&user.username, "username")?;
        require(&user.password, "password")?;
        require(&user.email, "email")?;

        let stored = User {
            username: user.username.clone(),
            password: self.scheme.hash(&user.password)?,
            email: user.email.clone(),
        };
        self.backend.insert_user(&stored)
    }

    /// `Ok(None)` when nobody has that username.
    pub fn get(&self, username: &str) -> Result<Option<User>> {
        self.backend.get_user(username)
    }

    /// Whether `password` matches the credential stored for `user`.
    pub fn verify(&self, user: &User, password: &str) -> bool {
        self.scheme.verify(password, &user.password)
    }

    /// Drops `username` and any tokens it holds. Absent users are not an error.
    pub fn remove(&self, username: &str) -> Result<()> {
        self.backend.delete_user(username).map(|_| ())
    }

    pub fn clear(&self) -> Result<()> {
        self.backend.clear_users()
    }
}
