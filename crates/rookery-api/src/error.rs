use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rookery_types::api::ErrorResponse;
use rookery_types::{ErrorKind, LobbyError};

/// Lobby failure on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub LobbyError);

impl ApiError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self(LobbyError::invalid(reason))
    }

    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::InvalidArgument | ErrorKind::NotFound => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::AlreadyExists | ErrorKind::AlreadyTaken => StatusCode::FORBIDDEN,
            ErrorKind::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LobbyError> for ApiError {
    fn from(err: LobbyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: format!("Error: {}", self.0),
        };
        (self.status(), Json(body)).into_response()
    }
}
