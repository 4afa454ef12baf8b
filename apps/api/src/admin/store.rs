use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::service::{find_identity_by_email, insert_identity};
use crate::errors::AppError;
use crate::models::admin::{AdminRow, AdminWithUserRow};
use crate::models::auth::User;
use crate::models::company::{Company, CompanyWithAdminRow};
use crate::models::profile::{Profile, ProfileSummary};
use crate::session::context::generate_anonymous_name;

#[derive(Debug, Clone, Serialize)]
pub struct CompanyWithAdmin {
    #[serde(flatten)]
    pub company: Company,
    pub admin: Option<ProfileSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminWithUser {
    #[serde(flatten)]
    pub admin: AdminRow,
    pub user: Option<ProfileSummary>,
}

/// A validated company-account request with the password already hashed.
#[derive(Debug, Clone)]
pub struct CompanyAccount {
    pub email: String,
    pub password_hash: String,
    pub company_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedCompany {
    pub user: User,
    pub company: Company,
    pub profile: Profile,
}

/// Storage behind the admin console.
///
/// Carried in `AdminConsole` as `Arc<dyn AdminStore>`.
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn is_platform_admin(&self, user_id: Uuid) -> Result<bool, AppError>;

    async fn companies_with_admins(&self) -> Result<Vec<CompanyWithAdmin>, AppError>;

    async fn admins_with_users(&self) -> Result<Vec<AdminWithUser>, AppError>;

    /// Creates the auth identity, the company and the admin's profile as a
    /// single unit: either all three exist afterwards or none do.
    async fn provision_company(&self, account: CompanyAccount)
        -> Result<ProvisionedCompany, AppError>;

    /// Grants admin rights to the identity for `email`, creating a
    /// password-less identity if none exists. Idempotent.
    async fn provision_admin(&self, email: &str, full_name: &str) -> Result<AdminRow, AppError>;
}

pub struct PgAdminStore {
    db: PgPool,
}

impl PgAdminStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn is_platform_admin(&self, user_id: Uuid) -> Result<bool, AppError> {
        Ok(
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM admins WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?,
        )
    }

    async fn companies_with_admins(&self) -> Result<Vec<CompanyWithAdmin>, AppError> {
        let rows = sqlx::query_as::<_, CompanyWithAdminRow>(
            r#"
            SELECT c.*,
                   (SELECT jsonb_build_object('full_name', p.full_name, 'email', p.email)
                    FROM profiles p WHERE p.id = c.admin_id) AS admin
            FROM companies c
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CompanyWithAdmin {
                company: row.company,
                admin: row.admin.map(|a| a.0),
            })
            .collect())
    }

    async fn admins_with_users(&self) -> Result<Vec<AdminWithUser>, AppError> {
        let rows = sqlx::query_as::<_, AdminWithUserRow>(
            r#"
            SELECT a.*,
                   (SELECT jsonb_build_object('full_name', p.full_name, 'email', p.email)
                    FROM profiles p WHERE p.id = a.user_id) AS "user"
            FROM admins a
            ORDER BY a.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AdminWithUser {
                admin: row.admin,
                user: row.user.map(|u| u.0),
            })
            .collect())
    }

    async fn provision_company(
        &self,
        account: CompanyAccount,
    ) -> Result<ProvisionedCompany, AppError> {
        let admin_name = format!("{} Admin", account.company_name);
        let anonymous_name = generate_anonymous_name(&mut rand::thread_rng());
        let mut tx = self.db.begin().await?;

        let identity = insert_identity(
            &mut tx,
            &account.email,
            Some(&account.password_hash),
            Some(&admin_name),
        )
        .await?;

        let company = sqlx::query_as::<_, Company>(
            "INSERT INTO companies (name, admin_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(&account.company_name)
        .bind(identity.id)
        .fetch_one(&mut *tx)
        .await?;

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, email, full_name, anonymous_name)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(identity.id)
        .bind(&identity.email)
        .bind(&admin_name)
        .bind(&anonymous_name)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        info!("Provisioned company {} with admin {}", company.id, identity.id);

        Ok(ProvisionedCompany {
            user: identity.into(),
            company,
            profile,
        })
    }

    async fn provision_admin(&self, email: &str, full_name: &str) -> Result<AdminRow, AppError> {
        let anonymous_name = generate_anonymous_name(&mut rand::thread_rng());
        let mut tx = self.db.begin().await?;

        let identity = match find_identity_by_email(&mut *tx, email).await? {
            Some(existing) => existing,
            None => insert_identity(&mut tx, email, None, Some(full_name)).await?,
        };

        sqlx::query(
            r#"
            INSERT INTO profiles (id, email, full_name, anonymous_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET full_name = EXCLUDED.full_name, updated_at = now()
            "#,
        )
        .bind(identity.id)
        .bind(&identity.email)
        .bind(full_name)
        .bind(&anonymous_name)
        .execute(&mut *tx)
        .await?;

        let admin = sqlx::query_as::<_, AdminRow>(
            r#"
            INSERT INTO admins (user_id) VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING *
            "#,
        )
        .bind(identity.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        info!("Granted admin rights to {}", identity.id);
        Ok(admin)
    }
}
