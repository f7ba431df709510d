//! Feedback API handler

use axum::{extract::State, response::Json};

use crate::feed::{FeedbackAck, FeedbackRequest};
use crate::state::SharedState;

/// POST /api/feedback - Submit feedback on a meeting
///
/// Fire-and-forget: always acknowledges success regardless of what the sink
/// does, so the dashboard never blocks or errors on feedback.
pub async fn submit_feedback(
    State(state): State<SharedState>,
    Json(request): Json<FeedbackRequest>,
) -> Json<FeedbackAck> {
    let feed = {
        let state = state.read().await;
        state.feed.clone()
    };
    Json(feed.submit_feedback(&request).await)
}
