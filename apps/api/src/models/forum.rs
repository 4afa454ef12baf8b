use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::profile::Profile;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Thread {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_anonymous: bool,
    pub tags: Vec<String>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub view_count: i32,
}

#[derive(Debug, Clone, FromRow)]
pub struct ThreadWithAuthorRow {
    #[sqlx(flatten)]
    pub thread: Thread,
    pub author: Option<Json<Profile>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub thread_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub is_anonymous: bool,
    pub parent_id: Option<Uuid>,
    pub upvotes: i32,
    pub downvotes: i32,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthorRow {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub author: Option<Json<Profile>>,
}
