use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::applications::queries::fetch_user_applications;
use crate::errors::AppError;
use crate::models::application::{ApplicationStatus, ApplicationWithJob};
use crate::session::extractor::CurrentSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplicationListQuery {
    /// A status name, or `all` (the default) for every status.
    pub status: Option<String>,
}

impl ApplicationListQuery {
    fn status_filter(&self) -> Result<Option<ApplicationStatus>, AppError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(AppError::Validation),
        }
    }
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<ApplicationListQuery>,
) -> Result<Json<Vec<ApplicationWithJob>>, AppError> {
    let status = params.status_filter()?;
    let applications = fetch_user_applications(&state.db, session.user.id, status, None).await?;
    Ok(Json(applications))
}
