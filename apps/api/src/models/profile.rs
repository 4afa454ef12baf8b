use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One row per authenticated user. Carries a public identity and a parallel
/// anonymous identity used when privacy mode is active.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub resume_url: Option<String>,
    pub avatar_url: Option<String>,
    pub title: Option<String>,
    pub years_of_experience: Option<i32>,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub work_history: Value,
    /// Assigned once at creation; never touched by profile edits.
    pub anonymous_name: Option<String>,
    pub anonymous_bio: Option<String>,
    pub anonymous_avatar_url: Option<String>,
    pub anonymous_title: Option<String>,
    pub anonymous_years_of_experience: Option<String>,
    pub anonymous_skills: Vec<String>,
    pub anonymous_education: Vec<String>,
    pub anonymous_work_history: Value,
    pub job_types: Vec<String>,
    pub desired_salary_range: Option<Value>,
    pub remote_preference: Option<String>,
    pub is_actively_looking: bool,
}

/// Fields supplied when a profile row is created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub anonymous_name: Option<String>,
}

/// Name and email of a profile, embedded in admin listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub full_name: String,
    pub email: String,
}
