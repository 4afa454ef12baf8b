use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dashboard::forms::{CompanyForm, JobForm};
use crate::errors::AppError;
use crate::models::application::{
    Application, ApplicationStatus, ApplicationWithApplicant, ApplicationWithApplicantRow,
};
use crate::models::company::Company;
use crate::models::job::JobListing;

/// Storage behind the company dashboard. Every method except
/// `company_for_admin` is scoped to a company the caller has already been
/// shown to administer.
///
/// Carried in `CompanyDashboard` as `Arc<dyn DashboardStore>`.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    async fn company_for_admin(&self, user_id: Uuid) -> Result<Option<Company>, AppError>;

    /// Applications to the company's listings with job and applicant, newest first.
    async fn applications_for_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<ApplicationWithApplicant>, AppError>;

    /// All of the company's listings, active or not, newest first.
    async fn listings_for_company(&self, company_id: Uuid) -> Result<Vec<JobListing>, AppError>;

    async fn update_company(&self, company_id: Uuid, form: &CompanyForm)
        -> Result<Company, AppError>;

    async fn insert_job(&self, company_id: Uuid, form: &JobForm) -> Result<JobListing, AppError>;

    async fn set_job_active(
        &self,
        company_id: Uuid,
        job_id: Uuid,
        is_active: bool,
    ) -> Result<Option<JobListing>, AppError>;

    async fn find_application(
        &self,
        company_id: Uuid,
        application_id: Uuid,
    ) -> Result<Option<Application>, AppError>;

    /// Moves `from` to `to`. `None` when the stored status is no longer `from`.
    async fn update_application_status(
        &self,
        application_id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Option<Application>, AppError>;
}

pub struct PgDashboardStore {
    db: PgPool,
}

impl PgDashboardStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DashboardStore for PgDashboardStore {
    async fn company_for_admin(&self, user_id: Uuid) -> Result<Option<Company>, AppError> {
        Ok(sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE admin_id = $1 ORDER BY created_at LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?)
    }

    async fn applications_for_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<ApplicationWithApplicant>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationWithApplicantRow>(
            r#"
            SELECT a.*, to_jsonb(j) AS job, to_jsonb(p) AS applicant
            FROM applications a
            JOIN job_listings j ON j.id = a.job_id
            LEFT JOIN profiles p ON p.id = a.user_id
            WHERE j.company_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(ApplicationWithApplicant::from)
            .collect())
    }

    async fn listings_for_company(&self, company_id: Uuid) -> Result<Vec<JobListing>, AppError> {
        Ok(sqlx::query_as::<_, JobListing>(
            "SELECT * FROM job_listings WHERE company_id = $1 ORDER BY created_at DESC",
        )
        .bind(company_id)
        .fetch_all(&self.db)
        .await?)
    }

    async fn update_company(
        &self,
        company_id: Uuid,
        form: &CompanyForm,
    ) -> Result<Company, AppError> {
        Ok(sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies SET
                name = $2,
                website = $3,
                industry = $4,
                size = $5,
                location = $6,
                description = $7,
                mission = $8,
                culture = $9,
                logo_url = $10,
                founded_year = $11,
                benefits = $12,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(&form.name)
        .bind(&form.website)
        .bind(&form.industry)
        .bind(&form.size)
        .bind(&form.location)
        .bind(&form.description)
        .bind(&form.mission)
        .bind(&form.culture)
        .bind(&form.logo_url)
        .bind(form.founded_year)
        .bind(&form.benefits)
        .fetch_one(&self.db)
        .await?)
    }

    async fn insert_job(&self, company_id: Uuid, form: &JobForm) -> Result<JobListing, AppError> {
        Ok(sqlx::query_as::<_, JobListing>(
            r#"
            INSERT INTO job_listings
                (company_id, title, description, requirements, responsibilities, location,
                 is_remote, job_type, salary_range, skills_required, experience_level,
                 education_required, benefits, application_deadline, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, TRUE)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(&form.title)
        .bind(&form.description)
        .bind(&form.requirements)
        .bind(&form.responsibilities)
        .bind(&form.location)
        .bind(form.is_remote)
        .bind(&form.job_type)
        .bind(&form.salary_range)
        .bind(&form.skills_required)
        .bind(&form.experience_level)
        .bind(&form.education_required)
        .bind(&form.benefits)
        .bind(form.application_deadline)
        .fetch_one(&self.db)
        .await?)
    }

    async fn set_job_active(
        &self,
        company_id: Uuid,
        job_id: Uuid,
        is_active: bool,
    ) -> Result<Option<JobListing>, AppError> {
        Ok(sqlx::query_as::<_, JobListing>(
            r#"
            UPDATE job_listings SET is_active = $1, updated_at = now()
            WHERE id = $2 AND company_id = $3
            RETURNING *
            "#,
        )
        .bind(is_active)
        .bind(job_id)
        .bind(company_id)
        .fetch_optional(&self.db)
        .await?)
    }

    async fn find_application(
        &self,
        company_id: Uuid,
        application_id: Uuid,
    ) -> Result<Option<Application>, AppError> {
        Ok(sqlx::query_as::<_, Application>(
            r#"
            SELECT a.*
            FROM applications a
            JOIN job_listings j ON j.id = a.job_id
            WHERE a.id = $1 AND j.company_id = $2
            "#,
        )
        .bind(application_id)
        .bind(company_id)
        .fetch_optional(&self.db)
        .await?)
    }

    async fn update_application_status(
        &self,
        application_id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Option<Application>, AppError> {
        Ok(sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications SET status = $1, updated_at = now()
            WHERE id = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(to.as_str())
        .bind(application_id)
        .bind(from.as_str())
        .fetch_optional(&self.db)
        .await?)
    }
}
