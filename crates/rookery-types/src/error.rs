use crate::models::{Color, TableId};

/// Failure kinds surfaced by every store and lobby operation.
///
/// Storage-level failures (I/O, a poisoned lock, a broken SQLite handle) are
/// folded into [`LobbyError::Unavailable`] at the adapter boundary so that
/// callers never see backend-specific error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    /// Missing, empty or malformed input.
    #[error("bad request: {0}")]
    InvalidArgument(String),

    /// Unknown or revoked token, or a credential mismatch at login.
    #[error("unauthorized")]
    Unauthorized,

    /// No table with this id.
    #[error("game {0} not found")]
    NotFound(TableId),

    /// A record with this key is already present.
    #[error("already taken: {0}")]
    AlreadyExists(String),

    /// The requested seat already has an occupant.
    #[error("{0} seat already taken")]
    AlreadyTaken(Color),

    /// The storage backend could not complete the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Field-less view of [`LobbyError`] for callers that only branch on the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    Unauthorized,
    NotFound,
    AlreadyExists,
    AlreadyTaken,
    Unavailable,
}

impl LobbyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::AlreadyTaken(_) => ErrorKind::AlreadyTaken,
            Self::Unavailable(_) => ErrorKind::Unavailable,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, LobbyError>;

/// Rejects empty and whitespace-only values.
pub fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LobbyError::invalid(format!("{field} is required")));
    }
    Ok(())
}
