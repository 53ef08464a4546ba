use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use rookery_types::LobbyError;
use tracing::error;

use crate::error::ApiError;
use crate::lobby::Lobby;
use crate::{auth, games};

pub type AppState = Arc<Lobby>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/user", post(auth::register))
        .route("/session", post(auth::login).delete(auth::logout))
        .route(
            "/game",
            get(games::list_games)
                .post(games::create_game)
                .put(games::join_game),
        )
        .route("/db", delete(auth::clear))
        .with_state(state)
}

/// Runs a lobby operation off the async runtime; storage calls block.
pub(crate) async fn run_blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Lobby) -> rookery_types::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let lobby = state.clone();
    tokio::task::spawn_blocking(move || f(&lobby))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError(LobbyError::unavailable("worker task failed"))
        })?
        .map_err(ApiError::from)
}
