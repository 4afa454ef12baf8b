use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::discussions::display::{thread_matches, CommentView, ThreadView};
use crate::errors::AppError;
use crate::models::forum::{CommentWithAuthorRow, Thread, ThreadWithAuthorRow};
use crate::session::extractor::{CurrentSession, OptionalSession};
use crate::state::AppState;
use crate::validation::normalize_list;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ThreadTab {
    #[default]
    All,
    MyThreads,
}

#[derive(Debug, Deserialize)]
pub struct ThreadListQuery {
    #[serde(default)]
    pub tab: ThreadTab,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewThread {
    #[validate(length(min = 5, message = "Title must be at least 5 characters."))]
    pub title: String,
    #[validate(length(min = 20, message = "Content must be at least 20 characters."))]
    pub content: String,
    #[serde(default = "default_anonymous")]
    pub is_anonymous: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_anonymous() -> bool {
    true
}

impl NewThread {
    fn validated(self) -> Result<Self, AppError> {
        let form = NewThread {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            is_anonymous: self.is_anonymous,
            tags: normalize_list(self.tags),
        };
        form.validate()?;
        Ok(form)
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedThread {
    pub thread: Thread,
    pub redirect_to: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewComment {
    #[validate(length(min = 1, message = "Comment cannot be empty."))]
    pub content: String,
    #[serde(default = "default_anonymous")]
    pub is_anonymous: bool,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ThreadDetailResponse {
    pub thread: ThreadView,
    pub comments: Vec<CommentView>,
}

/// GET /api/v1/threads?tab=all|my-threads&search=
pub async fn handle_list_threads(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Query(params): Query<ThreadListQuery>,
) -> Result<Json<Vec<ThreadView>>, AppError> {
    let author_filter = match params.tab {
        ThreadTab::All => None,
        ThreadTab::MyThreads => Some(session.ok_or(AppError::Unauthorized)?.user.id),
    };

    let rows = sqlx::query_as::<_, ThreadWithAuthorRow>(
        r#"
        SELECT t.*, to_jsonb(p) AS author
        FROM threads t
        LEFT JOIN profiles p ON p.id = t.author_id
        WHERE ($1::uuid IS NULL OR t.author_id = $1)
        ORDER BY t.created_at DESC
        "#,
    )
    .bind(author_filter)
    .fetch_all(&state.db)
    .await?;

    let query = params.search.unwrap_or_default();
    let threads = rows
        .into_iter()
        .map(ThreadView::from)
        .filter(|t| thread_matches(t, &query))
        .collect();

    Ok(Json(threads))
}

/// POST /api/v1/threads
pub async fn handle_create_thread(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(form): Json<NewThread>,
) -> Result<(StatusCode, Json<CreatedThread>), AppError> {
    let form = form.validated()?;

    let thread = sqlx::query_as::<_, Thread>(
        r#"
        INSERT INTO threads (author_id, title, content, is_anonymous, tags)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(session.user.id)
    .bind(&form.title)
    .bind(&form.content)
    .bind(form.is_anonymous)
    .bind(&form.tags)
    .fetch_one(&state.db)
    .await?;

    let redirect_to = format!("/discussions/{}", thread.id);
    Ok((
        StatusCode::CREATED,
        Json(CreatedThread {
            thread,
            redirect_to,
        }),
    ))
}

/// GET /api/v1/threads/:id
///
/// Counts as a view.
pub async fn handle_get_thread(
    State(state): State<AppState>,
    Path(thread_id): Path<Uuid>,
) -> Result<Json<ThreadDetailResponse>, AppError> {
    let row = sqlx::query_as::<_, ThreadWithAuthorRow>(
        r#"
        WITH viewed AS (
            UPDATE threads SET view_count = view_count + 1
            WHERE id = $1
            RETURNING *
        )
        SELECT t.*, to_jsonb(p) AS author
        FROM viewed t
        LEFT JOIN profiles p ON p.id = t.author_id
        "#,
    )
    .bind(thread_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Thread {thread_id} not found")))?;

    let comments = sqlx::query_as::<_, CommentWithAuthorRow>(
        r#"
        SELECT c.*, to_jsonb(p) AS author
        FROM comments c
        LEFT JOIN profiles p ON p.id = c.author_id
        WHERE c.thread_id = $1
        ORDER BY c.created_at ASC
        "#,
    )
    .bind(thread_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ThreadDetailResponse {
        thread: row.into(),
        comments: comments.into_iter().map(CommentView::from).collect(),
    }))
}

/// POST /api/v1/threads/:id/comments
pub async fn handle_add_comment(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(thread_id): Path<Uuid>,
    Json(form): Json<NewComment>,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    let form = NewComment {
        content: form.content.trim().to_string(),
        ..form
    };
    form.validate()?;

    let thread_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM threads WHERE id = $1)")
            .bind(thread_id)
            .fetch_one(&state.db)
            .await?;
    if !thread_exists {
        return Err(AppError::NotFound(format!("Thread {thread_id} not found")));
    }

    if let Some(parent_id) = form.parent_id {
        let parent_in_thread: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM comments WHERE id = $1 AND thread_id = $2)",
        )
        .bind(parent_id)
        .bind(thread_id)
        .fetch_one(&state.db)
        .await?;
        if !parent_in_thread {
            return Err(AppError::Validation(
                "Parent comment does not belong to this thread".to_string(),
            ));
        }
    }

    let row = sqlx::query_as::<_, CommentWithAuthorRow>(
        r#"
        WITH inserted AS (
            INSERT INTO comments (thread_id, author_id, content, is_anonymous, parent_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
        )
        SELECT c.*, to_jsonb(p) AS author
        FROM inserted c
        LEFT JOIN profiles p ON p.id = c.author_id
        "#,
    )
    .bind(thread_id)
    .bind(session.user.id)
    .bind(&form.content)
    .bind(form.is_anonymous)
    .bind(form.parent_id)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}
