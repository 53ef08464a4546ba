use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use rookery_types::api::{
    CreateGameRequest, CreateGameResponse, GameSummary, JoinGameRequest, ListGamesResponse,
};

use crate::error::ApiError;
use crate::extract::AuthToken;
use crate::routes::{AppState, run_blocking};

/// GET /game
pub async fn list_games(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
) -> Result<Json<ListGamesResponse>, ApiError> {
    let tables = run_blocking(&state, move |lobby| lobby.list_tables(&token)).await?;

    Ok(Json(ListGamesResponse {
        games: tables.into_iter().map(GameSummary::from).collect(),
    }))
}

/// POST /game
pub async fn create_game(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
    body: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<Json<CreateGameResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let name = req.game_name.unwrap_or_default();

    let game_id = run_blocking(&state, move |lobby| lobby.create_table(&token, &name)).await?;

    Ok(Json(CreateGameResponse { game_id }))
}

/// PUT /game
pub async fn join_game(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
    body: Result<Json<JoinGameRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let game_id = req
        .game_id
        .ok_or_else(|| ApiError::bad_request("gameID is required"))?;
    let color = req.player_color.unwrap_or_default();

    run_blocking(&state, move |lobby| lobby.join_table(&token, game_id, &color)).await?;

    Ok(Json(json!({})))
}
