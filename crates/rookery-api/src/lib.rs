//! The lobby core and its HTTP surface.
//!
//! [`Lobby`] is the only entry point the boundary layer uses. It composes the
//! credential store, the token store and the game registry, each of which
//! sits on a backend from `rookery-db`.

pub mod auth;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod games;
pub mod lobby;
pub mod password;
pub mod registry;
pub mod routes;
pub mod tokens;

pub use credentials::CredentialStore;
pub use lobby::Lobby;
pub use password::PasswordScheme;
pub use registry::GameRegistry;
pub use routes::{AppState, router};
pub use tokens::TokenStore;
