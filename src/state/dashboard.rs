//! Dashboard state and refresh coordination
//!
//! Owns the in-memory snapshot of meetings, stories, and flags, derives the
//! partitioned and window-filtered views, and mediates flag mutations. The
//! coordinator lock is never held across a fetch await, so flag toggles and
//! snapshot reads interleave freely while a refresh is in flight.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::feed::window::RelevanceWindow;
use crate::feed::{FeedClient, MatchType, Meeting, Story};

use super::flags::{self, FlagMap, FlagStore};

/// Shared handle to the application state
pub type SharedState = Arc<RwLock<AppState>>;

/// Load phase of the dashboard snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
    /// Nothing loaded yet
    Idle,
    /// Both feed calls are in flight
    Loading,
    /// Snapshot reflects the last settled refresh (possibly with partial data)
    Ready,
}

/// In-memory dashboard snapshot
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Meetings from the last settled fetch, already window-filtered
    pub meetings: Vec<Meeting>,
    /// Stories from the last settled fetch (currently always empty)
    pub stories: Vec<Story>,
    /// User flag annotations, keyed by meeting id
    pub flags: FlagMap,
    /// When the last refresh settled
    pub last_updated: Option<DateTime<Utc>>,
    /// Current load phase
    pub phase: LoadPhase,
}

impl DashboardState {
    /// Fresh snapshot carrying previously persisted flags
    pub fn new(flags: FlagMap) -> Self {
        Self {
            meetings: Vec::new(),
            stories: Vec::new(),
            flags,
            last_updated: None,
            phase: LoadPhase::Idle,
        }
    }

    /// Meetings explicitly referenced in prior stories
    pub fn mentioned(&self) -> Vec<&Meeting> {
        self.meetings
            .iter()
            .filter(|m| m.match_type == MatchType::Mentioned)
            .collect()
    }

    /// Meetings whose agendas matched story keywords
    pub fn keyword(&self) -> Vec<&Meeting> {
        self.meetings
            .iter()
            .filter(|m| m.match_type == MatchType::Keyword)
            .collect()
    }

    /// Meetings inside the 7-day window starting at `now`
    ///
    /// Re-applies the same window rule the feed client used, through the same
    /// shared window type, for the calendar view.
    pub fn upcoming(&self, now: DateTime<Utc>) -> Vec<&Meeting> {
        let window = RelevanceWindow::starting(now);
        self.meetings
            .iter()
            .filter(|m| window.contains_meeting(m))
            .collect()
    }

    /// Number of meetings in the snapshot (all match types)
    pub fn meeting_count(&self) -> usize {
        self.meetings.len()
    }

    /// Number of stories tracked
    pub fn story_count(&self) -> usize {
        self.stories.len()
    }

    /// Flip a user flag; returns the new value
    pub fn toggle_flag(&mut self, meeting_id: &str, flag_type: &str) -> bool {
        flags::toggle(&mut self.flags, meeting_id, flag_type)
    }

    /// Install a settled fetch result and mark the snapshot Ready
    ///
    /// Flag state is untouched; a refresh never resets annotations.
    pub fn apply_feed(&mut self, meetings: Vec<Meeting>, stories: Vec<Story>, now: DateTime<Utc>) {
        self.meetings = meetings;
        self.stories = stories;
        self.last_updated = Some(now);
        self.phase = LoadPhase::Ready;
    }
}

/// Main application state
///
/// The snapshot plus the capabilities the handlers need: the feed client, the
/// durable flag store, and the clock.
pub struct AppState {
    /// Dashboard snapshot
    pub dashboard: DashboardState,
    /// Client for the remote feed
    pub feed: FeedClient,
    /// Durable storage for user flags
    pub flag_store: Arc<dyn FlagStore>,
    /// Time source for window filtering
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Assemble the application state, loading persisted flags
    ///
    /// A missing or unreadable flag document yields an empty map; startup
    /// never fails on storage reads.
    pub fn new(feed: FeedClient, flag_store: Arc<dyn FlagStore>, clock: Arc<dyn Clock>) -> Self {
        let flags = flags::load_or_default(flag_store.as_ref());
        Self {
            dashboard: DashboardState::new(flags),
            feed,
            flag_store,
            clock,
        }
    }
}

/// Outcome of a refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Both feed calls settled and the snapshot was replaced
    Refreshed,
    /// A refresh was already in flight; this request was ignored
    Coalesced,
}

/// Run one refresh cycle: Loading, join both fetches, Ready
///
/// Both feed calls are issued concurrently and joined (not raced); the
/// snapshot is replaced only after both settle. Requests arriving while a
/// refresh is in flight are coalesced. Failures are absorbed inside the feed
/// client, so this never leaves the snapshot stuck in Loading.
pub async fn refresh(state: &SharedState) -> RefreshOutcome {
    let feed = {
        let mut locked = state.write().await;
        if locked.dashboard.phase == LoadPhase::Loading {
            tracing::debug!("Refresh already in flight; coalescing");
            return RefreshOutcome::Coalesced;
        }
        locked.dashboard.phase = LoadPhase::Loading;
        locked.feed.clone()
    };

    // Lock released: toggles and reads interleave while the fetches run
    let (meetings, stories) = tokio::join!(feed.fetch_meetings(), feed.fetch_stories());

    let mut locked = state.write().await;
    let now = locked.clock.now();
    locked.dashboard.apply_feed(meetings, stories, now);
    tracing::info!(
        meetings = locked.dashboard.meeting_count(),
        stories = locked.dashboard.story_count(),
        "Dashboard refreshed"
    );
    RefreshOutcome::Refreshed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn meeting(id: &str, date: &str, match_type: &str) -> Meeting {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "date": date,
            "matchType": match_type,
        }))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_state_is_idle_and_empty() {
        let state = DashboardState::new(FlagMap::new());
        assert_eq!(state.phase, LoadPhase::Idle);
        assert_eq!(state.meeting_count(), 0);
        assert_eq!(state.story_count(), 0);
        assert!(state.last_updated.is_none());
    }

    #[test]
    fn test_partition_is_exhaustive_and_disjoint() {
        let mut state = DashboardState::new(FlagMap::new());
        state.apply_feed(
            vec![
                meeting("1", "2025-06-03", "mentioned"),
                meeting("2", "2025-06-04", "keyword"),
                meeting("3", "2025-06-05", "mentioned"),
                meeting("4", "2025-06-05", "keyword"),
            ],
            Vec::new(),
            now(),
        );

        let mentioned: Vec<&str> = state.mentioned().iter().map(|m| m.id.as_str()).collect();
        let keyword: Vec<&str> = state.keyword().iter().map(|m| m.id.as_str()).collect();

        assert_eq!(mentioned, vec!["1", "3"]);
        assert_eq!(keyword, vec!["2", "4"]);
        for id in &mentioned {
            assert!(!keyword.contains(id));
        }
        assert_eq!(mentioned.len() + keyword.len(), state.meeting_count());
    }

    #[test]
    fn test_other_match_types_stay_out_of_both_partitions() {
        let mut state = DashboardState::new(FlagMap::new());
        state.apply_feed(
            vec![
                meeting("1", "2025-06-03", "mentioned"),
                meeting("2", "2025-06-04", "scored"),
            ],
            Vec::new(),
            now(),
        );

        assert_eq!(state.mentioned().len(), 1);
        assert!(state.keyword().is_empty());
        // Still present in the raw collection and its count
        assert_eq!(state.meeting_count(), 2);
        // And still visible to the calendar view
        assert_eq!(state.upcoming(now()).len(), 2);
    }

    #[test]
    fn test_upcoming_applies_the_window() {
        let mut state = DashboardState::new(FlagMap::new());
        state.apply_feed(
            vec![
                meeting("in", "2025-06-04", "mentioned"),
                meeting("out", "2025-06-20", "keyword"),
                meeting("bad", "someday", "keyword"),
            ],
            Vec::new(),
            now(),
        );

        let upcoming: Vec<&str> = state.upcoming(now()).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(upcoming, vec!["in"]);

        // Shifting now moves the window
        let later = now() + Duration::days(15);
        let upcoming_later: Vec<&str> = state
            .upcoming(later)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(upcoming_later, vec!["out"]);
    }

    #[test]
    fn test_apply_feed_marks_ready_and_keeps_flags() {
        let mut flags = FlagMap::new();
        flags::toggle(&mut flags, "1", "reviewed");
        let mut state = DashboardState::new(flags);

        state.apply_feed(
            vec![meeting("2", "2025-06-04", "keyword")],
            Vec::new(),
            now(),
        );

        assert_eq!(state.phase, LoadPhase::Ready);
        assert_eq!(state.last_updated, Some(now()));
        assert!(flags::is_flagged(&state.flags, "1", "reviewed"));
    }

    #[test]
    fn test_toggle_flag_goes_through_the_map() {
        let mut state = DashboardState::new(FlagMap::new());

        assert!(state.toggle_flag("1", "important"));
        assert!(!state.toggle_flag("1", "important"));
    }
}
