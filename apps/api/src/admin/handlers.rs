use axum::{extract::State, http::StatusCode, Json};

use crate::admin::console::{AdminOverview, AdminRequest, CompanyAccountRequest};
use crate::admin::store::ProvisionedCompany;
use crate::errors::AppError;
use crate::models::admin::AdminRow;
use crate::session::extractor::CurrentSession;
use crate::state::AppState;

/// GET /api/v1/admin
pub async fn handle_get_overview(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<AdminOverview>, AppError> {
    let overview = state.admin.overview(session.user.id).await?;
    Ok(Json(overview))
}

/// POST /api/v1/admin/companies
pub async fn handle_provision_company(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<CompanyAccountRequest>,
) -> Result<(StatusCode, Json<ProvisionedCompany>), AppError> {
    let provisioned = state.admin.provision_company(session.user.id, req).await?;
    Ok((StatusCode::CREATED, Json(provisioned)))
}

/// POST /api/v1/admin/admins
pub async fn handle_provision_admin(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<AdminRequest>,
) -> Result<(StatusCode, Json<AdminRow>), AppError> {
    let admin = state.admin.provision_admin(session.user.id, req).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}
