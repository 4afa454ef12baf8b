use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationStatus, ApplicationWithJob, ApplicationWithJobRow};

/// A user's applications with listing and company, newest first.
/// `status` narrows to one status; `limit` caps the count.
pub async fn fetch_user_applications(
    pool: &PgPool,
    user_id: Uuid,
    status: Option<ApplicationStatus>,
    limit: Option<i64>,
) -> Result<Vec<ApplicationWithJob>, AppError> {
    let rows = sqlx::query_as::<_, ApplicationWithJobRow>(
        r#"
        SELECT a.*, to_jsonb(j) AS job, to_jsonb(c) AS company
        FROM applications a
        JOIN job_listings j ON j.id = a.job_id
        JOIN companies c ON c.id = j.company_id
        WHERE a.user_id = $1
          AND ($2::text IS NULL OR a.status = $2)
        ORDER BY a.created_at DESC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(status.map(|s| s.as_str()))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ApplicationWithJob::from).collect())
}
