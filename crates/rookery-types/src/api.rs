use serde::{Deserialize, Serialize};

use crate::models::{AuthData, Table, TableId};

// -- Auth --

/// Fields are optional so that a missing field reaches the lobby as an empty
/// value and is rejected there with the same error as an empty one.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub username: String,
    pub auth_token: String,
}

impl From<AuthData> for AuthResponse {
    fn from(auth: AuthData) -> Self {
        Self {
            username: auth.username,
            auth_token: auth.token,
        }
    }
}

// -- Games --

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    #[serde(rename = "gameName")]
    pub game_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateGameResponse {
    #[serde(rename = "gameID")]
    pub game_id: TableId,
}

#[derive(Debug, Deserialize)]
pub struct JoinGameRequest {
    #[serde(rename = "playerColor")]
    pub player_color: Option<String>,
    #[serde(rename = "gameID")]
    pub game_id: Option<TableId>,
}

/// Listing entry. The rules-state is left out; clients fetch it through the
/// game transport, not the lobby.
#[derive(Debug, Serialize)]
pub struct GameSummary {
    #[serde(rename = "gameID")]
    pub game_id: TableId,
    #[serde(rename = "whiteUsername")]
    pub white_username: Option<String>,
    #[serde(rename = "blackUsername")]
    pub black_username: Option<String>,
    #[serde(rename = "gameName")]
    pub game_name: String,
}

impl From<Table> for GameSummary {
    fn from(table: Table) -> Self {
        Self {
            game_id: table.id,
            white_username: table.white,
            black_username: table.black,
            game_name: table.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListGamesResponse {
    pub games: Vec<GameSummary>,
}

// -- Errors --

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
