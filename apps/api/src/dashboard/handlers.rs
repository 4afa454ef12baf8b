use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::dashboard::forms::{CompanyForm, JobForm};
use crate::dashboard::service::DashboardOverview;
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::company::Company;
use crate::models::job::JobListing;
use crate::session::extractor::CurrentSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobActiveToggle {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: ApplicationStatus,
}

/// GET /api/v1/company/dashboard
pub async fn handle_get_dashboard(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<DashboardOverview>, AppError> {
    let overview = state.dashboard.overview(session.user.id).await?;
    Ok(Json(overview))
}

/// PUT /api/v1/company
pub async fn handle_update_company(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(form): Json<CompanyForm>,
) -> Result<Json<Company>, AppError> {
    let updated = state.dashboard.update_company(session.user.id, form).await?;
    Ok(Json(updated))
}

/// POST /api/v1/company/jobs
pub async fn handle_post_job(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(form): Json<JobForm>,
) -> Result<(StatusCode, Json<JobListing>), AppError> {
    let job = state
        .dashboard
        .post_job(session.user.id, form, Utc::now().date_naive())
        .await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PATCH /api/v1/company/jobs/:id
pub async fn handle_set_job_active(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(job_id): Path<Uuid>,
    Json(req): Json<JobActiveToggle>,
) -> Result<Json<JobListing>, AppError> {
    let job = state
        .dashboard
        .set_job_active(session.user.id, job_id, req.is_active)
        .await?;
    Ok(Json(job))
}

/// PATCH /api/v1/company/applications/:id
pub async fn handle_set_application_status(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(application_id): Path<Uuid>,
    Json(req): Json<StatusChange>,
) -> Result<Json<Application>, AppError> {
    let updated = state
        .dashboard
        .set_application_status(session.user.id, application_id, req.status)
        .await?;
    Ok(Json(updated))
}
