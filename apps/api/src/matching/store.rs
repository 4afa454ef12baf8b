use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::Application;
use crate::models::job::{JobListing, JobWithCompany, JobWithCompanyRow};
use crate::models::swipe::{Swipe, SwipeDirection};

/// What a committed swipe wrote: the swipe row, plus the pending
/// application when the swipe was to the right.
#[derive(Debug, Clone, Serialize)]
pub struct SwipeRecord {
    pub swipe: Swipe,
    pub application: Option<Application>,
}

/// Storage the match engine reads and writes.
///
/// Carried in `MatchEngine` as `Arc<dyn MatchStore>`.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn swiped_job_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError>;

    /// Active listings whose id is not in `excluded`, newest first.
    async fn active_listings_excluding(
        &self,
        excluded: &[Uuid],
    ) -> Result<Vec<JobWithCompany>, AppError>;

    async fn find_listing(&self, job_id: Uuid) -> Result<Option<JobListing>, AppError>;

    /// Writes the swipe and, for right swipes, the pending application as
    /// one unit. A repeated (user, job) pair is a `Conflict` and writes nothing.
    async fn record_swipe(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        direction: SwipeDirection,
    ) -> Result<SwipeRecord, AppError>;
}

pub struct PgMatchStore {
    db: PgPool,
}

impl PgMatchStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn swiped_job_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(
            sqlx::query_scalar("SELECT job_id FROM swipes WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.db)
                .await?,
        )
    }

    async fn active_listings_excluding(
        &self,
        excluded: &[Uuid],
    ) -> Result<Vec<JobWithCompany>, AppError> {
        let rows = sqlx::query_as::<_, JobWithCompanyRow>(
            r#"
            SELECT j.*, to_jsonb(c) AS company
            FROM job_listings j
            JOIN companies c ON c.id = j.company_id
            WHERE j.is_active AND NOT (j.id = ANY($1))
            ORDER BY j.created_at DESC
            "#,
        )
        .bind(excluded)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(JobWithCompany::from).collect())
    }

    async fn find_listing(&self, job_id: Uuid) -> Result<Option<JobListing>, AppError> {
        Ok(
            sqlx::query_as::<_, JobListing>("SELECT * FROM job_listings WHERE id = $1")
                .bind(job_id)
                .fetch_optional(&self.db)
                .await?,
        )
    }

    async fn record_swipe(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        direction: SwipeDirection,
    ) -> Result<SwipeRecord, AppError> {
        let mut tx = self.db.begin().await?;

        let swipe: Swipe = sqlx::query_as(
            "INSERT INTO swipes (user_id, job_id, direction) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(job_id)
        .bind(direction.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "You have already swiped on this job"))?;

        let application = match direction {
            SwipeDirection::Right => Some(
                sqlx::query_as::<_, Application>(
                    r#"
                    INSERT INTO applications (user_id, job_id, status)
                    VALUES ($1, $2, 'pending')
                    RETURNING *
                    "#,
                )
                .bind(user_id)
                .bind(job_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::conflict_on_unique(e, "You have already applied to this job")
                })?,
            ),
            SwipeDirection::Left => None,
        };

        tx.commit().await?;
        Ok(SwipeRecord { swipe, application })
    }
}
