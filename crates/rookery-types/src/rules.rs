//! Seam to the chess rules engine.
//!
//! The lobby never looks inside a game's rules-state. It asks the engine for
//! a starting value when a table is created, stores the serialized form, and
//! hands the same value back on every read and update.

use serde::{Deserialize, Serialize};

use crate::models::Color;

/// Opaque, serialized rules-engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RulesState(String);

impl RulesState {
    pub fn from_serialized(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

pub trait RulesEngine: Send + Sync {
    /// State for a game that has not started yet.
    fn new_game(&self) -> RulesState;
}

/// Ranks 8 down to 1; uppercase is white, `.` is an empty square.
const STARTING_BOARD: [&str; 8] = [
    "rnbqkbnr", "pppppppp", "........", "........", "........", "........", "PPPPPPPP",
    "RNBQKBNR",
];

/// Produces the standard chess starting position with white to move.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardChess;

impl RulesEngine for StandardChess {
    fn new_game(&self) -> RulesState {
        let position = serde_json::json!({
            "turn": Color::White,
            "board": STARTING_BOARD,
        });
        RulesState(position.to_string())
    }
}
