use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::auth::service::{Credentials, SignedIn};
use crate::errors::AppError;
use crate::session::context::SessionState;
use crate::session::extractor::{BearerToken, CurrentSession};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub redirect_to: &'static str,
}

/// POST /api/v1/auth/sign-up
pub async fn handle_sign_up(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> Result<(StatusCode, Json<SignedIn>), AppError> {
    let signed_in = state.auth.sign_up(req).await?;
    Ok((StatusCode::CREATED, Json(signed_in)))
}

/// POST /api/v1/auth/sign-in
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> Result<Json<SignedIn>, AppError> {
    let signed_in = state.auth.sign_in(&req.email, &req.password).await?;
    Ok(Json(signed_in))
}

/// POST /api/v1/auth/sign-out
///
/// Signing out always sends the client back to the home route.
pub async fn handle_sign_out(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<SignOutResponse>, AppError> {
    state.auth.sign_out(token).await?;
    Ok(Json(SignOutResponse { redirect_to: "/" }))
}

/// GET /api/v1/auth/session
pub async fn handle_get_session(CurrentSession(session): CurrentSession) -> Json<SessionState> {
    Json(session)
}
