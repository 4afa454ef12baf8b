//! Forum display rules: anonymous posts show the author's anonymous
//! identity and never expose who wrote them.

use serde::Serialize;
use uuid::Uuid;

use crate::models::forum::{Comment, CommentWithAuthorRow, Thread, ThreadWithAuthorRow};
use crate::models::profile::Profile;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthorDisplay {
    /// Hidden for anonymous posts.
    pub id: Option<Uuid>,
    pub name: String,
    pub avatar_url: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThreadView {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub title: String,
    pub content: String,
    pub is_anonymous: bool,
    pub tags: Vec<String>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub view_count: i32,
    pub author: AuthorDisplay,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub is_anonymous: bool,
    pub upvotes: i32,
    pub downvotes: i32,
    pub author: AuthorDisplay,
}

pub fn author_display(author_id: Uuid, author: Option<&Profile>, is_anonymous: bool) -> AuthorDisplay {
    if is_anonymous {
        return AuthorDisplay {
            id: None,
            name: author
                .and_then(|p| p.anonymous_name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Anonymous User".to_string()),
            avatar_url: author.and_then(|p| p.anonymous_avatar_url.clone()),
            title: author.and_then(|p| p.anonymous_title.clone()),
        };
    }

    AuthorDisplay {
        id: Some(author_id),
        name: author
            .map(|p| p.full_name.clone())
            .unwrap_or_else(|| "Unknown User".to_string()),
        avatar_url: author.and_then(|p| p.avatar_url.clone()),
        title: author.and_then(|p| p.title.clone()),
    }
}

impl From<ThreadWithAuthorRow> for ThreadView {
    fn from(row: ThreadWithAuthorRow) -> Self {
        let Thread {
            id,
            created_at,
            author_id,
            title,
            content,
            is_anonymous,
            tags,
            upvotes,
            downvotes,
            view_count,
            ..
        } = row.thread;
        let author = author_display(author_id, row.author.as_ref().map(|p| &p.0), is_anonymous);

        ThreadView {
            id,
            created_at,
            title,
            content,
            is_anonymous,
            tags,
            upvotes,
            downvotes,
            view_count,
            author,
        }
    }
}

impl From<CommentWithAuthorRow> for CommentView {
    fn from(row: CommentWithAuthorRow) -> Self {
        let Comment {
            id,
            created_at,
            author_id,
            parent_id,
            content,
            is_anonymous,
            upvotes,
            downvotes,
            ..
        } = row.comment;
        let author = author_display(author_id, row.author.as_ref().map(|p| &p.0), is_anonymous);

        CommentView {
            id,
            created_at,
            parent_id,
            content,
            is_anonymous,
            upvotes,
            downvotes,
            author,
        }
    }
}

/// Case-insensitive substring match over title, content and tags.
pub fn thread_matches(thread: &ThreadView, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    thread.title.to_lowercase().contains(&query)
        || thread.content.to_lowercase().contains(&query)
        || thread.tags.iter().any(|t| t.to_lowercase().contains(&query))
}
