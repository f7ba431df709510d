//! Remote feed client
//!
//! Fetches the pre-scored meeting collection and the story collection over
//! HTTP. Failures never reach the dashboard as errors: the boundary methods
//! are total and degrade to empty results with a diagnostic log entry
//! (availability over correctness for a read-mostly view). The raw `Result`
//! surface stays visible to tests so failure is observable without masking.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::clock::Clock;
use crate::config::FeedConfig;

use super::feedback::{FeedbackSink, LoggingFeedbackSink};
use super::types::{FeedbackAck, FeedbackRequest, Meeting, Story};
use super::window::RelevanceWindow;

/// Error types for the feed fetch path
///
/// These never escape the boundary methods; they exist so tests and logs can
/// tell transport, status, and parse failures apart.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Request never completed (DNS, connect, timeout, ...)
    #[error("feed request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Feed answered with a non-success status
    #[error("feed returned HTTP status {0}")]
    Status(u16),

    /// Feed body was not a JSON array of meetings
    #[error("feed returned malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// HTTP client for the remote meeting feed
#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
    story_delay: Duration,
    meeting_delay: Duration,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn FeedbackSink>,
}

impl FeedClient {
    /// Create a client against the configured feed
    pub fn new(config: &FeedConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            story_delay: Duration::from_millis(config.story_delay_ms),
            meeting_delay: Duration::from_millis(config.meeting_delay_ms),
            clock,
            sink: Arc::new(LoggingFeedbackSink),
        }
    }

    /// Replace the feedback sink (used when a real backend lands)
    pub fn with_sink(mut self, sink: Arc<dyn FeedbackSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Fetch the story collection
    ///
    /// Always succeeds from the caller's point of view. The artificial
    /// minimum latency avoids a loading flash in the dashboard and is
    /// configurable (zero in tests). The feed no longer scrapes stories, so
    /// the collection is empty.
    pub async fn fetch_stories(&self) -> Vec<Story> {
        tokio::time::sleep(self.story_delay).await;
        Vec::new()
    }

    /// Fetch the meeting collection, filtered to the 7-day relevance window
    ///
    /// Total at this boundary: transport, status, and parse failures degrade
    /// to an empty collection plus a warning log entry. Callers must not
    /// assume fetch failures are observable as errors.
    pub async fn fetch_meetings(&self) -> Vec<Meeting> {
        match self.fetch_meetings_raw().await {
            Ok(meetings) => meetings,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch meetings; returning empty collection");
                Vec::new()
            }
        }
    }

    /// Fetch and window-filter the meeting collection, surfacing failures
    ///
    /// The typed error surface keeps failures observable in tests; production
    /// callers go through [`fetch_meetings`](Self::fetch_meetings).
    pub async fn fetch_meetings_raw(&self) -> Result<Vec<Meeting>, FeedError> {
        tokio::time::sleep(self.meeting_delay).await;

        let url = format!("{}/scored_meetings.json", self.base_url);
        tracing::debug!(url = %url, "Fetching scored meetings");

        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let meetings: Vec<Meeting> = serde_json::from_str(&body)?;
        let total = meetings.len();

        let window = RelevanceWindow::starting(self.clock.now());
        let filtered: Vec<Meeting> = meetings
            .into_iter()
            .filter(|meeting| window.contains_meeting(meeting))
            .collect();

        tracing::info!(
            total = total,
            in_window = filtered.len(),
            "Fetched meetings"
        );

        Ok(filtered)
    }

    /// Submit feedback on a meeting
    ///
    /// Fire-and-forget: delegates to the injected sink, absorbs any sink
    /// error, and unconditionally acknowledges success.
    pub async fn submit_feedback(&self, request: &FeedbackRequest) -> FeedbackAck {
        if let Err(e) = self.sink.submit(request).await {
            tracing::warn!(
                error = %e,
                meeting_id = %request.meeting_id,
                "Feedback sink failed; acknowledging anyway"
            );
        }
        FeedbackAck::success()
    }
}
