use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use rookery_types::LobbyError;

use crate::error::ApiError;

/// Token from the `Authorization` header, raw or with a `Bearer ` prefix.
///
/// Only presence is checked here; whether the token is live is the lobby's call.
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

impl<S> FromRequestParts<S> for AuthToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ApiError(LobbyError::Unauthorized))?;

        let token = value.strip_prefix("Bearer ").unwrap_or(value);
        Ok(Self(token.to_string()))
    }
}
