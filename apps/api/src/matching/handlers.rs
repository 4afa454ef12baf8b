use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::engine::{Deck, SwipeOutcome};
use crate::models::swipe::SwipeDirection;
use crate::session::extractor::CurrentSession;
use crate::state::AppState;

/// Either an explicit direction (buttons) or the horizontal offset of a
/// released drag (gesture). An explicit direction wins.
#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub direction: Option<SwipeDirection>,
    pub drag_offset_x: Option<f64>,
}

impl SwipeRequest {
    fn resolve_direction(&self) -> Result<SwipeDirection, AppError> {
        if let Some(direction) = self.direction {
            return Ok(direction);
        }
        let dx = self.drag_offset_x.ok_or_else(|| {
            AppError::Validation("Either direction or drag_offset_x is required".to_string())
        })?;
        SwipeDirection::from_drag_offset(dx).ok_or_else(|| {
            AppError::Validation("Drag distance is below the swipe threshold".to_string())
        })
    }
}

/// GET /api/v1/jobs/deck
pub async fn handle_get_deck(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Deck>, AppError> {
    let deck = state.matcher.build_deck(session.user.id).await?;
    Ok(Json(deck))
}

/// POST /api/v1/jobs/:id/swipe
pub async fn handle_swipe(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(job_id): Path<Uuid>,
    Json(req): Json<SwipeRequest>,
) -> Result<Json<SwipeOutcome>, AppError> {
    let direction = req.resolve_direction()?;
    let outcome = state
        .matcher
        .swipe(session.user.id, job_id, direction)
        .await?;
    Ok(Json(outcome))
}
