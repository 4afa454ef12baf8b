use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::companies::filters::{distinct_industries, filter_companies};
use crate::errors::AppError;
use crate::models::company::Company;
use crate::models::job::JobListing;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompanyListQuery {
    pub search: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub companies: Vec<Company>,
    /// Drawn from the unfiltered list so the industry menu stays stable.
    pub industries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanyDetailResponse {
    pub company: Company,
    pub jobs: Vec<JobListing>,
}

/// GET /api/v1/companies
pub async fn handle_list_companies(
    State(state): State<AppState>,
    Query(params): Query<CompanyListQuery>,
) -> Result<Json<CompanyListResponse>, AppError> {
    let companies = sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name")
        .fetch_all(&state.db)
        .await?;

    let industries = distinct_industries(&companies);
    let companies = filter_companies(
        companies,
        params.search.as_deref(),
        params.industry.as_deref(),
    );

    Ok(Json(CompanyListResponse {
        companies,
        industries,
    }))
}

/// GET /api/v1/companies/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<CompanyDetailResponse>, AppError> {
    let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
        .bind(company_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {company_id} not found")))?;

    let jobs = sqlx::query_as::<_, JobListing>(
        r#"
        SELECT * FROM job_listings
        WHERE company_id = $1 AND is_active
        ORDER BY created_at DESC
        "#,
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(CompanyDetailResponse { company, jobs }))
}
