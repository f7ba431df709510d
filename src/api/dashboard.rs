//! Dashboard API handlers
//!
//! Snapshot, refresh, and raw meeting listing. Handlers only map state to
//! responses; the refresh cycle itself lives in the state module.

use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::feed::Meeting;
use crate::state::{self, AppState, FlagMap, LoadPhase, RefreshOutcome, SharedState};

/// Full dashboard snapshot response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Current load phase
    pub phase: LoadPhase,
    /// When the last refresh settled
    pub last_updated: Option<DateTime<Utc>>,
    /// Number of stories tracked
    pub stories_tracked: usize,
    /// Number of meetings in the snapshot (all match types)
    pub meeting_count: usize,
    /// Meetings explicitly referenced in prior stories
    pub mentioned: Vec<Meeting>,
    /// Meetings whose agendas matched story keywords
    pub keyword: Vec<Meeting>,
    /// Window-filtered meetings for the calendar view
    pub calendar: Vec<Meeting>,
    /// User flag annotations
    pub flags: FlagMap,
}

impl DashboardResponse {
    /// Snapshot the current state into a response
    pub fn from_state(state: &AppState) -> Self {
        let dashboard = &state.dashboard;
        let now = state.clock.now();
        Self {
            phase: dashboard.phase,
            last_updated: dashboard.last_updated,
            stories_tracked: dashboard.story_count(),
            meeting_count: dashboard.meeting_count(),
            mentioned: dashboard.mentioned().into_iter().cloned().collect(),
            keyword: dashboard.keyword().into_iter().cloned().collect(),
            calendar: dashboard.upcoming(now).into_iter().cloned().collect(),
            flags: dashboard.flags.clone(),
        }
    }
}

/// Refresh response: the fresh snapshot plus whether the request was coalesced
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// True if another refresh was already in flight and this one was ignored
    pub coalesced: bool,
    /// Snapshot after the refresh settled (or the in-flight one, if coalesced)
    pub dashboard: DashboardResponse,
}

/// Meetings list response
#[derive(Serialize)]
pub struct MeetingsListResponse {
    /// Meetings from the last settled fetch, already window-filtered
    pub meetings: Vec<Meeting>,
    /// Total number of meetings
    pub count: usize,
}

/// GET /api/dashboard - Current snapshot with derived views
pub async fn get_dashboard(State(state): State<SharedState>) -> Json<DashboardResponse> {
    let state = state.read().await;
    Json(DashboardResponse::from_state(&state))
}

/// POST /api/refresh - Re-run the load cycle
///
/// Requests arriving while a refresh is in flight are coalesced, not queued.
pub async fn refresh_dashboard(State(state): State<SharedState>) -> Json<RefreshResponse> {
    let outcome = state::refresh(&state).await;
    let state = state.read().await;
    Json(RefreshResponse {
        coalesced: outcome == RefreshOutcome::Coalesced,
        dashboard: DashboardResponse::from_state(&state),
    })
}

/// GET /api/meetings - Raw filtered meeting collection
pub async fn list_meetings(State(state): State<SharedState>) -> Json<MeetingsListResponse> {
    let state = state.read().await;
    let meetings = state.dashboard.meetings.clone();
    Json(MeetingsListResponse {
        count: meetings.len(),
        meetings,
    })
}
