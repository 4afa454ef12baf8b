use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::profile::ProfileSummary;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub founded_year: Option<i32>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub benefits: Vec<String>,
    pub culture: Option<String>,
    /// The user whose id appears here is this company's admin.
    pub admin_id: Option<Uuid>,
}

/// Company row joined with its admin's name and email.
#[derive(Debug, Clone, FromRow)]
pub struct CompanyWithAdminRow {
    #[sqlx(flatten)]
    pub company: Company,
    pub admin: Option<Json<ProfileSummary>>,
}
