//! Feedback sink collaborator
//!
//! Feedback submission is fire-and-forget today: no durable backend exists.
//! The sink is an injected seam so a real backend can be swapped in without
//! touching the feed client or its callers.

use async_trait::async_trait;

use super::types::FeedbackRequest;

/// Destination for user feedback on a meeting
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// Deliver one feedback submission
    ///
    /// Errors are absorbed by the caller; the user always sees a success
    /// acknowledgment.
    async fn submit(&self, request: &FeedbackRequest) -> anyhow::Result<()>;
}

/// Sink that records submissions in the log and does nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingFeedbackSink;

#[async_trait]
impl FeedbackSink for LoggingFeedbackSink {
    async fn submit(&self, request: &FeedbackRequest) -> anyhow::Result<()> {
        tracing::info!(
            meeting_id = %request.meeting_id,
            feedback_type = %request.feedback_type,
            "Feedback received"
        );
        Ok(())
    }
}
