//! Public/anonymous display projection of a profile. Pure: switching the
//! view mode never touches stored data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::profile::Profile;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Public,
    Anonymous,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DisplayProfile {
    pub mode: ViewMode,
    pub name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub title: Option<String>,
    pub experience: String,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub work_history: Value,
}

pub fn project(profile: &Profile, mode: ViewMode) -> DisplayProfile {
    match mode {
        ViewMode::Public => DisplayProfile {
            mode,
            name: profile.full_name.clone(),
            bio: profile.bio.clone(),
            avatar_url: profile.avatar_url.clone(),
            title: profile.title.clone(),
            experience: match profile.years_of_experience {
                Some(years) if years > 0 => format!("{years} years"),
                _ => "Not specified".to_string(),
            },
            skills: profile.skills.clone(),
            education: profile.education.clone(),
            work_history: profile.work_history.clone(),
        },
        ViewMode::Anonymous => DisplayProfile {
            mode,
            name: non_empty(&profile.anonymous_name).unwrap_or("Anonymous User").to_string(),
            bio: Some(
                non_empty(&profile.anonymous_bio)
                    .unwrap_or("No anonymous bio provided")
                    .to_string(),
            ),
            avatar_url: profile.anonymous_avatar_url.clone(),
            title: Some(
                non_empty(&profile.anonymous_title)
                    .unwrap_or("Professional")
                    .to_string(),
            ),
            experience: non_empty(&profile.anonymous_years_of_experience)
                .unwrap_or("Not specified")
                .to_string(),
            skills: profile.anonymous_skills.clone(),
            education: profile.anonymous_education.clone(),
            work_history: profile.anonymous_work_history.clone(),
        },
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
