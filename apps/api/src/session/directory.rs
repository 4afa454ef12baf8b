use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{NewProfile, Profile};

/// Lookups the session context needs to hydrate a signed-in user.
///
/// Carried in `SessionContext` as `Arc<dyn ProfileDirectory>`.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError>;

    /// Creates the profile, or returns the existing row if another request
    /// created it first.
    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile, AppError>;

    async fn is_company_admin(&self, user_id: Uuid) -> Result<bool, AppError>;
}

pub struct PgProfileDirectory {
    db: PgPool,
}

impl PgProfileDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileDirectory for PgProfileDirectory {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(
            sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?,
        )
    }

    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile, AppError> {
        let inserted: Option<Profile> = sqlx::query_as(
            r#"
            INSERT INTO profiles (id, email, full_name, anonymous_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(&profile.full_name)
        .bind(&profile.anonymous_name)
        .fetch_optional(&self.db)
        .await?;

        match inserted {
            Some(row) => Ok(row),
            None => self
                .find_profile(profile.id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", profile.id))),
        }
    }

    async fn is_company_admin(&self, user_id: Uuid) -> Result<bool, AppError> {
        Ok(
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM companies WHERE admin_id = $1)")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?,
        )
    }
}
