use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::profile::ProfileSummary;

/// Marker row granting platform-admin privileges to a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, FromRow)]
pub struct AdminWithUserRow {
    #[sqlx(flatten)]
    pub admin: AdminRow,
    pub user: Option<Json<ProfileSummary>>,
}
