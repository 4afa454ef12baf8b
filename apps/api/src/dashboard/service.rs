use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dashboard::forms::{CompanyForm, JobForm};
use crate::dashboard::store::DashboardStore;
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus, ApplicationWithApplicant};
use crate::models::company::Company;
use crate::models::job::JobListing;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub company: Company,
    pub applications: Vec<ApplicationWithApplicant>,
    pub jobs: Vec<JobListing>,
}

/// Company-admin operations. Every entry point resolves the caller's
/// company first; a caller without one is refused before anything else is
/// read or written.
pub struct CompanyDashboard {
    store: Arc<dyn DashboardStore>,
}

impl CompanyDashboard {
    pub fn new(store: Arc<dyn DashboardStore>) -> Self {
        Self { store }
    }

    async fn require_company(&self, user_id: Uuid) -> Result<Company, AppError> {
        match self.store.company_for_admin(user_id).await? {
            Some(company) => Ok(company),
            None => {
                warn!("User {user_id} refused access to company dashboard");
                Err(AppError::Forbidden)
            }
        }
    }

    pub async fn overview(&self, caller: Uuid) -> Result<DashboardOverview, AppError> {
        let company = self.require_company(caller).await?;
        let applications = self.store.applications_for_company(company.id).await?;
        let jobs = self.store.listings_for_company(company.id).await?;
        Ok(DashboardOverview {
            company,
            applications,
            jobs,
        })
    }

    pub async fn update_company(
        &self,
        caller: Uuid,
        form: CompanyForm,
    ) -> Result<Company, AppError> {
        let company = self.require_company(caller).await?;
        let form = form.validated()?;

        let updated = self.store.update_company(company.id, &form).await?;
        info!("Company {} updated by {caller}", company.id);
        Ok(updated)
    }

    pub async fn post_job(
        &self,
        caller: Uuid,
        form: JobForm,
        today: NaiveDate,
    ) -> Result<JobListing, AppError> {
        let company = self.require_company(caller).await?;
        let form = form.validated(today)?;

        let job = self.store.insert_job(company.id, &form).await?;
        info!("Company {} posted job {}", company.id, job.id);
        Ok(job)
    }

    pub async fn set_job_active(
        &self,
        caller: Uuid,
        job_id: Uuid,
        is_active: bool,
    ) -> Result<JobListing, AppError> {
        let company = self.require_company(caller).await?;
        self.store
            .set_job_active(company.id, job_id, is_active)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
    }

    pub async fn set_application_status(
        &self,
        caller: Uuid,
        application_id: Uuid,
        to: ApplicationStatus,
    ) -> Result<Application, AppError> {
        let company = self.require_company(caller).await?;

        let current = self
            .store
            .find_application(company.id, application_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

        let from: ApplicationStatus = current
            .status
            .parse()
            .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))?;
        if !from.can_transition_to(to) {
            return Err(AppError::Validation(format!(
                "Cannot move an application from {from} to {to}"
            )));
        }

        // Guarded on the old status so a concurrent change is not overwritten.
        let updated = self
            .store
            .update_application_status(application_id, from, to)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Application status changed, reload and try again".to_string())
            })?;

        info!(
            "Application {application_id} moved {from} -> {to} by company {}",
            company.id
        );
        Ok(updated)
    }
}
