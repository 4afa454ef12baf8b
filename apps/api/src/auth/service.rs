use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::events::{AuthEvent, AuthEvents};
use crate::errors::AppError;
use crate::models::auth::{AuthSession, AuthUser, User};
use validator::Validate;

/// Email and password as submitted to sign-up and sign-in.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,
}

impl Credentials {
    pub fn normalized(self) -> Self {
        Credentials {
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

/// Result of a successful sign-up or sign-in.
#[derive(Debug, Serialize)]
pub struct SignedIn {
    pub user: User,
    pub session: AuthSession,
}

/// A session is dead once `expires_at` is reached; `resolve_session` only
/// accepts tokens with `expires_at > now()`.
const PRUNE_EXPIRED_SESSIONS: &str =
    "DELETE FROM auth_sessions WHERE user_id = $1 AND expires_at <= now()";

/// Password identities and opaque bearer sessions stored in Postgres.
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    events: AuthEvents,
    session_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(db: PgPool, events: AuthEvents, session_ttl_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            db,
            events,
            session_ttl: Duration::hours(session_ttl_hours),
            bcrypt_cost,
        }
    }

    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    pub async fn sign_up(&self, credentials: Credentials) -> Result<SignedIn, AppError> {
        let credentials = credentials.normalized();
        credentials.validate()?;

        let hash = hash_password(&credentials.password, self.bcrypt_cost).await?;
        let mut conn = self.db.acquire().await?;
        let user = insert_identity(&mut conn, &credentials.email, Some(&hash), None).await?;
        drop(conn);

        info!("Registered user {}", user.id);
        self.open_session(user.into()).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AppError> {
        let user = find_identity_by_email(&self.db, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        // Invited identities have no password until one is set.
        let hash = user
            .password_hash
            .clone()
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.open_session(user.into()).await
    }

    pub async fn sign_out(&self, token: Uuid) -> Result<(), AppError> {
        let user_id: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM auth_sessions WHERE token = $1 RETURNING user_id")
                .bind(token)
                .fetch_optional(&self.db)
                .await?;

        let user_id = user_id.ok_or(AppError::Unauthorized)?;
        info!("User {user_id} signed out");
        self.events.publish(AuthEvent::SignedOut { user_id });
        Ok(())
    }

    /// Returns the identity behind a live, unexpired session token.
    pub async fn resolve_session(&self, token: Uuid) -> Result<Option<User>, AppError> {
        let user: Option<AuthUser> = sqlx::query_as(
            r#"
            SELECT u.*
            FROM auth_sessions s
            JOIN auth_users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;

        Ok(user.map(User::from))
    }

    /// Issues a new token and drops the user's expired ones in the same
    /// transaction, so dead rows never outlive the next sign-in.
    async fn open_session(&self, user: User) -> Result<SignedIn, AppError> {
        let expires_at = Utc::now() + self.session_ttl;
        let mut tx = self.db.begin().await?;

        let pruned = sqlx::query(PRUNE_EXPIRED_SESSIONS)
            .bind(user.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let session: AuthSession = sqlx::query_as(
            "INSERT INTO auth_sessions (token, user_id, expires_at) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        if pruned > 0 {
            debug!("Pruned {pruned} expired sessions for user {}", user.id);
        }
        info!("User {} signed in", user.id);
        self.events.publish(AuthEvent::SignedIn { user: user.clone() });
        Ok(SignedIn { user, session })
    }
}

/// Inserts an auth identity on the given connection so callers can make it
/// part of a larger transaction. Emails are stored lower-cased.
pub async fn insert_identity(
    conn: &mut PgConnection,
    email: &str,
    password_hash: Option<&str>,
    full_name: Option<&str>,
) -> Result<AuthUser, AppError> {
    sqlx::query_as(
        r#"
        INSERT INTO auth_users (email, password_hash, full_name)
        VALUES (lower($1), $2, $3)
        RETURNING *
        "#,
    )
    .bind(email.trim())
    .bind(password_hash)
    .bind(full_name)
    .fetch_one(conn)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "User already registered"))
}

pub async fn find_identity_by_email<'e, E>(executor: E, email: &str) -> Result<Option<AuthUser>, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    Ok(
        sqlx::query_as("SELECT * FROM auth_users WHERE email = lower($1)")
            .bind(email.trim())
            .fetch_optional(executor)
            .await?,
    )
}

/// bcrypt is CPU-bound; run it off the async workers.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| anyhow::anyhow!("password hashing task failed: {e}"))?
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    Ok(hash)
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hash = hash.to_string();
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| anyhow::anyhow!("password verification task failed: {e}"))?
        .map_err(|e| anyhow::anyhow!("password verification failed: {e}"))?;
    Ok(ok)
}
