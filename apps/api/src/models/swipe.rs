use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Horizontal drag distance a release must exceed to count as a decision.
pub const DRAG_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
        }
    }

    /// Classifies a released drag by its horizontal displacement.
    /// `None` means the card snaps back and nothing is recorded.
    pub fn from_drag_offset(dx: f64) -> Option<SwipeDirection> {
        if dx > DRAG_THRESHOLD {
            Some(SwipeDirection::Right)
        } else if dx < -DRAG_THRESHOLD {
            Some(SwipeDirection::Left)
        } else {
            None
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of a user's decision on a listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Swipe {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub direction: String,
}
