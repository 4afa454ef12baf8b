//! Fixtures and in-memory trait implementations for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::auth::User;
use crate::models::company::Company;
use crate::models::job::{JobListing, JobWithCompany};
use crate::models::profile::{NewProfile, Profile};
use crate::session::directory::ProfileDirectory;

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn user(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        full_name: None,
    }
}

pub fn profile(new: NewProfile) -> Profile {
    Profile {
        id: new.id,
        created_at: epoch(),
        updated_at: epoch(),
        full_name: new.full_name,
        email: new.email,
        phone: None,
        location: None,
        bio: None,
        resume_url: None,
        avatar_url: None,
        title: None,
        years_of_experience: None,
        skills: vec![],
        education: vec![],
        work_history: json!([]),
        anonymous_name: new.anonymous_name,
        anonymous_bio: None,
        anonymous_avatar_url: None,
        anonymous_title: None,
        anonymous_years_of_experience: None,
        anonymous_skills: vec![],
        anonymous_education: vec![],
        anonymous_work_history: json!([]),
        job_types: vec![],
        desired_salary_range: None,
        remote_preference: None,
        is_actively_looking: true,
    }
}

pub fn company(name: &str, industry: Option<&str>) -> Company {
    Company {
        id: Uuid::new_v4(),
        created_at: epoch(),
        updated_at: epoch(),
        name: name.to_string(),
        logo_url: None,
        website: None,
        industry: industry.map(str::to_string),
        size: None,
        founded_year: None,
        location: None,
        description: None,
        mission: None,
        benefits: vec![],
        culture: None,
        admin_id: None,
    }
}

/// A listing created `minutes` after the fixture epoch.
pub fn listing(company: &Company, title: &str, active: bool, minutes: i64) -> JobWithCompany {
    JobWithCompany {
        job: JobListing {
            id: Uuid::new_v4(),
            created_at: epoch() + Duration::minutes(minutes),
            updated_at: epoch() + Duration::minutes(minutes),
            company_id: company.id,
            title: title.to_string(),
            description: format!("{title} description"),
            requirements: vec![],
            responsibilities: vec![],
            location: None,
            is_remote: false,
            job_type: None,
            salary_range: None,
            skills_required: vec![],
            experience_level: None,
            education_required: None,
            benefits: vec![],
            application_deadline: None,
            is_active: active,
        },
        company: company.clone(),
    }
}

#[derive(Default)]
pub struct MemoryProfileDirectory {
    profiles: Mutex<Vec<Profile>>,
    company_admins: Mutex<HashSet<Uuid>>,
    failing: bool,
}

impl MemoryProfileDirectory {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.lock().unwrap().len()
    }

    pub fn add_company_admin(&self, user_id: Uuid) {
        self.company_admins.lock().unwrap().insert(user_id);
    }

    fn check(&self) -> Result<(), AppError> {
        if self.failing {
            Err(AppError::Internal(anyhow::anyhow!("directory unavailable")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProfileDirectory for MemoryProfileDirectory {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        self.check()?;
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == user_id)
            .cloned())
    }

    async fn insert_profile(&self, new: NewProfile) -> Result<Profile, AppError> {
        self.check()?;
        let mut profiles = self.profiles.lock().unwrap();
        if let Some(existing) = profiles.iter().find(|p| p.id == new.id) {
            return Ok(existing.clone());
        }
        let row = profile(new);
        profiles.push(row.clone());
        Ok(row)
    }

    async fn is_company_admin(&self, user_id: Uuid) -> Result<bool, AppError> {
        self.check()?;
        Ok(self.company_admins.lock().unwrap().contains(&user_id))
    }
}
