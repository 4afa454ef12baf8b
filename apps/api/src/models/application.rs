use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::job::{JobListing, JobWithCompany};
use crate::models::profile::Profile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Interview,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Accepted and rejected are terminal. Pending may move anywhere forward,
    /// interview only to a final decision.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Pending, Interview) | (Pending, Accepted) | (Pending, Rejected)
                | (Interview, Accepted)
                | (Interview, Rejected)
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown application status '{s}'"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: String,
    pub notes: Option<String>,
}

/// An applicant's view of one of their applications.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: JobWithCompany,
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationWithJobRow {
    #[sqlx(flatten)]
    pub application: Application,
    pub job: Json<JobListing>,
    pub company: Json<crate::models::company::Company>,
}

impl From<ApplicationWithJobRow> for ApplicationWithJob {
    fn from(row: ApplicationWithJobRow) -> Self {
        ApplicationWithJob {
            application: row.application,
            job: JobWithCompany {
                job: row.job.0,
                company: row.company.0,
            },
        }
    }
}

/// A company's view of an application: the listing and the applicant.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithApplicant {
    #[serde(flatten)]
    pub application: Application,
    pub job: JobListing,
    pub user: Option<Profile>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationWithApplicantRow {
    #[sqlx(flatten)]
    pub application: Application,
    pub job: Json<JobListing>,
    pub applicant: Option<Json<Profile>>,
}

impl From<ApplicationWithApplicantRow> for ApplicationWithApplicant {
    fn from(row: ApplicationWithApplicantRow) -> Self {
        ApplicationWithApplicant {
            application: row.application,
            job: row.job.0,
            user: row.applicant.map(|p| p.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
        assert!("hired".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_terminal_statuses_never_transition() {
        for next in ApplicationStatus::ALL {
            assert!(!ApplicationStatus::Accepted.can_transition_to(next));
            assert!(!ApplicationStatus::Rejected.can_transition_to(next));
        }
    }

    #[test]
    fn test_interview_cannot_return_to_pending() {
        assert!(!ApplicationStatus::Interview.can_transition_to(ApplicationStatus::Pending));
        assert!(ApplicationStatus::Interview.can_transition_to(ApplicationStatus::Accepted));
        assert!(ApplicationStatus::Pending.can_transition_to(ApplicationStatus::Interview));
    }
}
