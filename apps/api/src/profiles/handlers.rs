use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::applications::queries::fetch_user_applications;
use crate::errors::AppError;
use crate::models::application::ApplicationWithJob;
use crate::models::profile::Profile;
use crate::profiles::projection::{project, DisplayProfile, ViewMode};
use crate::session::extractor::CurrentSession;
use crate::state::AppState;
use crate::validation::{blank_to_none, normalize_list};

/// Applications shown alongside the profile.
const RECENT_APPLICATIONS: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct ProfileViewQuery {
    #[serde(default)]
    pub view: ViewMode,
}

#[derive(Debug, Serialize)]
pub struct ProfileViewResponse {
    pub display: DisplayProfile,
    pub is_actively_looking: bool,
    pub recent_applications: Vec<ApplicationWithJob>,
}

/// Editable profile fields. `anonymous_name` is deliberately absent: it is
/// assigned at creation and cannot be changed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub full_name: String,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub title: Option<String>,
    #[validate(range(min = 0, message = "Years of experience cannot be negative."))]
    pub years_of_experience: Option<i32>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    pub anonymous_bio: Option<String>,
    pub anonymous_title: Option<String>,
    #[serde(default)]
    pub anonymous_skills: Vec<String>,
    #[serde(default)]
    pub anonymous_education: Vec<String>,
    #[serde(default = "default_actively_looking")]
    pub is_actively_looking: bool,
}

fn default_actively_looking() -> bool {
    true
}

impl ProfileUpdate {
    /// Normalizes lists and blank optional fields, then validates.
    pub fn validated(self) -> Result<Self, AppError> {
        let form = ProfileUpdate {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: blank_to_none(self.phone),
            location: blank_to_none(self.location),
            bio: blank_to_none(self.bio),
            title: blank_to_none(self.title),
            years_of_experience: self.years_of_experience,
            skills: normalize_list(self.skills),
            education: normalize_list(self.education),
            anonymous_bio: blank_to_none(self.anonymous_bio),
            anonymous_title: blank_to_none(self.anonymous_title),
            anonymous_skills: normalize_list(self.anonymous_skills),
            anonymous_education: normalize_list(self.anonymous_education),
            is_actively_looking: self.is_actively_looking,
        };
        form.validate()?;
        Ok(form)
    }
}

/// GET /api/v1/profile?view=public|anonymous
pub async fn handle_get_profile(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<ProfileViewQuery>,
) -> Result<Json<ProfileViewResponse>, AppError> {
    let profile = session.require_profile()?;
    let recent_applications = fetch_user_applications(
        &state.db,
        session.user.id,
        None,
        Some(RECENT_APPLICATIONS),
    )
    .await?;

    Ok(Json(ProfileViewResponse {
        display: project(profile, params.view),
        is_actively_looking: profile.is_actively_looking,
        recent_applications,
    }))
}

/// PUT /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(form): Json<ProfileUpdate>,
) -> Result<Json<Profile>, AppError> {
    session.require_profile()?;
    let form = form.validated()?;

    let updated = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles SET
            full_name = $2,
            email = $3,
            phone = $4,
            location = $5,
            bio = $6,
            title = $7,
            years_of_experience = $8,
            skills = $9,
            education = $10,
            anonymous_bio = $11,
            anonymous_title = $12,
            anonymous_skills = $13,
            anonymous_education = $14,
            is_actively_looking = $15,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(session.user.id)
    .bind(&form.full_name)
    .bind(&form.email)
    .bind(&form.phone)
    .bind(&form.location)
    .bind(&form.bio)
    .bind(&form.title)
    .bind(form.years_of_experience)
    .bind(&form.skills)
    .bind(&form.education)
    .bind(&form.anonymous_bio)
    .bind(&form.anonymous_title)
    .bind(&form.anonymous_skills)
    .bind(&form.anonymous_education)
    .bind(form.is_actively_looking)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProfileUpdate {
        serde_json::from_value(serde_json::json!({
            "full_name": " Jane Doe ",
            "email": "jane@example.com",
            "bio": "",
            "skills": ["Rust", " Rust", "SQL", ""],
        }))
        .unwrap()
    }

    #[test]
    fn test_defaults_and_normalization() {
        let form = form().validated().unwrap();
        assert!(form.is_actively_looking);
        assert_eq!(form.full_name, "Jane Doe");
        assert_eq!(form.bio, None);
        assert_eq!(form.skills, vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_anonymous_name_is_not_accepted() {
        let parsed: ProfileUpdate = serde_json::from_value(serde_json::json!({
            "full_name": "Jane Doe",
            "email": "jane@example.com",
            "anonymous_name": "Someone Else",
        }))
        .unwrap();
        // The field is ignored; nothing in the update can carry it.
        assert!(format!("{parsed:?}").contains("Jane Doe"));
        assert!(!format!("{parsed:?}").contains("Someone Else"));
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut short = form();
        short.full_name = "J".into();
        assert!(short.validated().is_err());

        let mut bad_email = form();
        bad_email.email = "jane".into();
        assert!(bad_email.validated().is_err());

        let mut negative = form();
        negative.years_of_experience = Some(-1);
        assert!(negative.validated().is_err());
    }
}
