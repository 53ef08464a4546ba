use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use rookery_types::api::{AuthResponse, LoginRequest, RegisterRequest};

use crate::error::ApiError;
use crate::extract::AuthToken;
use crate::routes::{AppState, run_blocking};

/// POST /user
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();
    let email = req.email.unwrap_or_default();

    let auth = run_blocking(&state, move |lobby| {
        lobby.register(&username, &password, &email)
    })
    .await?;

    Ok(Json(auth.into()))
}

/// POST /session
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let auth = run_blocking(&state, move |lobby| lobby.login(&username, &password)).await?;

    Ok(Json(auth.into()))
}

/// DELETE /session
pub async fn logout(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
) -> Result<Json<Value>, ApiError> {
    run_blocking(&state, move |lobby| lobby.logout(&token)).await?;
    Ok(Json(json!({})))
}

/// DELETE /db
pub async fn clear(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    run_blocking(&state, |lobby| lobby.reset_all()).await?;
    Ok(Json(json!({})))
}
