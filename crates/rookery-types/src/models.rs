use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LobbyError, Result};
use crate::rules::RulesState;

/// Registry-assigned table identifier. Never supplied by clients.
pub type TableId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// Stored credential, in whatever form the password scheme produced.
    pub password: String,
    pub email: String,
}

/// A bearer token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthData {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::White => "WHITE",
            Self::Black => "BLACK",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = LobbyError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("WHITE") {
            Ok(Self::White)
        } else if s.eq_ignore_ascii_case("BLACK") {
            Ok(Self::Black)
        } else {
            Err(LobbyError::invalid(format!("unknown player color '{s}'")))
        }
    }
}

/// A lobby entry: up to two seated users plus the opaque rules-engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub white: Option<String>,
    pub black: Option<String>,
    pub rules: RulesState,
}

impl Table {
    /// A freshly created table with both seats open.
    pub fn new(id: TableId, name: impl Into<String>, rules: RulesState) -> Self {
        Self {
            id,
            name: name.into(),
            white: None,
            black: None,
            rules,
        }
    }

    pub fn seat(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white.as_deref(),
            Color::Black => self.black.as_deref(),
        }
    }

    /// Puts `username` in the seat, failing if someone already sits there.
    /// Seats are never vacated, so this is the only seat transition.
    pub fn occupy(&mut self, color: Color, username: &str) -> Result<()> {
        let seat = match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        if seat.is_some() {
            return Err(LobbyError::AlreadyTaken(color));
        }
        *seat = Some(username.to_string());
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.white.is_some() && self.black.is_some()
    }
}
