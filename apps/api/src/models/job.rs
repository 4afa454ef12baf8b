use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::company::Company;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobListing {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub location: Option<String>,
    pub is_remote: bool,
    pub job_type: Option<String>,
    pub salary_range: Option<Value>,
    pub skills_required: Vec<String>,
    pub experience_level: Option<String>,
    pub education_required: Option<String>,
    pub benefits: Vec<String>,
    pub application_deadline: Option<NaiveDate>,
    pub is_active: bool,
}

/// Listing joined with its owning company, as returned to job seekers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobWithCompany {
    #[serde(flatten)]
    pub job: JobListing,
    pub company: Company,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobWithCompanyRow {
    #[sqlx(flatten)]
    pub job: JobListing,
    pub company: Json<Company>,
}

impl From<JobWithCompanyRow> for JobWithCompany {
    fn from(row: JobWithCompanyRow) -> Self {
        JobWithCompany {
            job: row.job,
            company: row.company.0,
        }
    }
}
