//! Shared types for the Rookery lobby: domain records, the error taxonomy,
//! the rules-engine seam and the HTTP request/response shapes.

pub mod api;
pub mod error;
pub mod models;
pub mod rules;

pub use error::{ErrorKind, LobbyError, Result, require};
pub use models::{AuthData, Color, Table, TableId, User};
pub use rules::{RulesEngine, RulesState, StandardChess};
