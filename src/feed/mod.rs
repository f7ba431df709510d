//! Feed client module
//!
//! Retrieves the scored meeting collection and the story collection from the
//! remote feed, applies the 7-day relevance window, and carries the feedback
//! stub. Depends on nothing else in-process except the injected clock.

pub mod client;
pub mod feedback;
pub mod types;
pub mod window;

pub use client::{FeedClient, FeedError};
pub use feedback::{FeedbackSink, LoggingFeedbackSink};
pub use types::{FeedbackAck, FeedbackRequest, MatchType, Meeting, MeetingId, Story};
pub use window::{parse_meeting_date, RelevanceWindow, RELEVANCE_WINDOW_DAYS};
