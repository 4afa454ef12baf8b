use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::context::SessionState;
use crate::state::AppState;

/// The opaque session token from `Authorization: Bearer <token>`.
pub struct BearerToken(pub Uuid);

/// A signed-in caller. Rejects with `Unauthorized` when the token is
/// missing, malformed, unknown or expired.
pub struct CurrentSession(pub SessionState);

/// Like `CurrentSession`, but signed-out callers are `None` instead of an error.
pub struct OptionalSession(pub Option<SessionState>);

fn bearer_token(parts: &Parts) -> Option<Uuid> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))?;
    Uuid::parse_str(token.trim()).ok()
}

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<SessionState>, AppError> {
    let Some(token) = bearer_token(parts) else {
        return Ok(None);
    };
    match state.auth.resolve_session(token).await? {
        Some(user) => Ok(Some(state.session.resolve(user).await)),
        None => Ok(None),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, AppError> {
        bearer_token(parts)
            .map(BearerToken)
            .ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        resolve(parts, state)
            .await?
            .map(CurrentSession)
            .ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        Ok(OptionalSession(resolve(parts, state).await?))
    }
}
