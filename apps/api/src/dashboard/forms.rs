use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::errors::AppError;
use crate::validation::{blank_to_none, normalize_list};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompanyForm {
    #[validate(length(min = 2, message = "Company name must be at least 2 characters."))]
    pub name: String,
    #[validate(url(message = "Please enter a valid URL."))]
    pub website: Option<String>,
    #[validate(length(min = 2, message = "Industry must be at least 2 characters."))]
    pub industry: String,
    pub size: Option<String>,
    #[validate(length(min = 2, message = "Location must be at least 2 characters."))]
    pub location: String,
    #[validate(length(min = 50, message = "Description must be at least 50 characters."))]
    pub description: String,
    #[validate(length(min = 20, message = "Mission statement must be at least 20 characters."))]
    pub mission: String,
    #[validate(length(min = 20, message = "Culture description must be at least 20 characters."))]
    pub culture: String,
    #[validate(url(message = "Please enter a valid URL."))]
    pub logo_url: Option<String>,
    pub founded_year: Option<i32>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl CompanyForm {
    /// Blank URLs are cleared before the URL rules run, so an empty
    /// website or logo field is accepted.
    pub fn validated(self) -> Result<Self, AppError> {
        let form = CompanyForm {
            name: self.name.trim().to_string(),
            website: blank_to_none(self.website),
            industry: self.industry.trim().to_string(),
            size: blank_to_none(self.size),
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
            mission: self.mission.trim().to_string(),
            culture: self.culture.trim().to_string(),
            logo_url: blank_to_none(self.logo_url),
            founded_year: self.founded_year,
            benefits: normalize_list(self.benefits),
        };
        form.validate()?;
        Ok(form)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobForm {
    #[validate(length(min = 2, message = "Title must be at least 2 characters."))]
    pub title: String,
    #[validate(length(min = 20, message = "Description must be at least 20 characters."))]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub is_remote: bool,
    pub job_type: Option<String>,
    pub salary_range: Option<Value>,
    #[serde(default)]
    pub skills_required: Vec<String>,
    pub experience_level: Option<String>,
    pub education_required: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub application_deadline: Option<NaiveDate>,
}

impl JobForm {
    /// `today` bounds the deadline; a listing cannot open already closed.
    pub fn validated(self, today: NaiveDate) -> Result<Self, AppError> {
        let form = JobForm {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            requirements: normalize_list(self.requirements),
            responsibilities: normalize_list(self.responsibilities),
            location: blank_to_none(self.location),
            is_remote: self.is_remote,
            job_type: blank_to_none(self.job_type),
            salary_range: self.salary_range,
            skills_required: normalize_list(self.skills_required),
            experience_level: blank_to_none(self.experience_level),
            education_required: blank_to_none(self.education_required),
            benefits: normalize_list(self.benefits),
            application_deadline: self.application_deadline,
        };
        form.validate()?;
        if form.application_deadline.is_some_and(|d| d < today) {
            return Err(AppError::Validation(
                "Application deadline cannot be in the past.".to_string(),
            ));
        }
        Ok(form)
    }
}
