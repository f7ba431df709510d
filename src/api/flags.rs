//! Flag API handlers
//!
//! Toggling never fails the request: a storage-write failure keeps the
//! in-memory toggle and reports a non-fatal notice instead, since silently
//! losing a user annotation would be worse than an unpersisted one.

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;

use crate::error::AppError;
use crate::feed::MeetingId;
use crate::state::{FlagMap, SharedState};

/// Response for a flag toggle
#[derive(Debug, Serialize)]
pub struct ToggleFlagResponse {
    /// Meeting the flag belongs to
    pub meeting_id: MeetingId,
    /// Flag type that was flipped
    pub flag_type: String,
    /// Value after the flip
    pub value: bool,
    /// Whether the full map reached durable storage
    pub persisted: bool,
    /// Non-fatal notice when persistence failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Flags listing response
#[derive(Serialize)]
pub struct FlagsResponse {
    /// The current flag map
    pub flags: FlagMap,
}

/// POST /api/meetings/:id/flags/:flag_type - Toggle a user flag
///
/// The map is re-serialized to durable storage before the response is sent.
/// No referential check against the feed: flags outlive their meetings.
pub async fn toggle_flag(
    State(state): State<SharedState>,
    Path((meeting_id, flag_type)): Path<(MeetingId, String)>,
) -> Result<Json<ToggleFlagResponse>, AppError> {
    if meeting_id.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "meeting id must not be blank".to_string(),
        ));
    }
    if flag_type.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "flag type must not be blank".to_string(),
        ));
    }

    let mut state = state.write().await;
    let value = state.dashboard.toggle_flag(&meeting_id, &flag_type);

    let (persisted, warning) = match state.flag_store.write(&state.dashboard.flags) {
        Ok(()) => (true, None),
        Err(e) => {
            tracing::warn!(
                error = %e,
                meeting_id = %meeting_id,
                flag_type = %flag_type,
                "Failed to persist flags; toggle kept in memory"
            );
            (
                false,
                Some(format!("flag saved in memory only: {}", e)),
            )
        }
    };

    Ok(Json(ToggleFlagResponse {
        meeting_id,
        flag_type,
        value,
        persisted,
        warning,
    }))
}

/// GET /api/flags - Current flag map
pub async fn list_flags(State(state): State<SharedState>) -> Json<FlagsResponse> {
    let state = state.read().await;
    Json(FlagsResponse {
        flags: state.dashboard.flags.clone(),
    })
}
