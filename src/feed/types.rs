//! Wire types for the remote meeting feed
//!
//! The feed is an externally produced JSON array; this service treats most of
//! its fields as opaque and passes them through unmodified. Only `id`, `date`,
//! and `matchType` carry behavior.

use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier for a meeting
///
/// Unique within a single fetched collection; a refresh may introduce a
/// previously unseen or reused id.
pub type MeetingId = String;

/// Why the feed considered a meeting relevant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// The meeting was explicitly referenced in a prior story
    Mentioned,
    /// Meeting agenda text matched keywords from prior stories
    Keyword,
    /// Anything else the feed emits, including an absent field
    #[default]
    #[serde(other)]
    Other,
}

/// One scheduled government/public meeting from the feed
///
/// Descriptive fields (title, agenda text, source, score, ...) are kept in
/// `extra` and round-trip unmodified; this service never mutates a meeting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    /// Unique identifier; the feed may encode it as a JSON string or number
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: MeetingId,
    /// Calendar timestamp as sent by the feed; parsed lazily, may be malformed
    pub date: String,
    /// Relevance classification; unknown or missing values map to `Other`
    #[serde(default)]
    pub match_type: MatchType,
    /// Opaque descriptive fields passed through unmodified
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A prior published article
///
/// The feed endpoint currently returns an empty collection; modeled for
/// forward compatibility with all fields opaque.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Story {
    /// Opaque story fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Request body for submitting feedback on a meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Meeting the feedback refers to
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub meeting_id: MeetingId,
    /// Kind of feedback (e.g. "useful", "not_relevant")
    pub feedback_type: String,
    /// Meeting context forwarded to the eventual backend
    #[serde(default)]
    pub context: serde_json::Value,
}

/// Acknowledgment returned for every feedback submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackAck {
    /// Always "success"; no durable backend exists yet
    pub status: String,
}

impl FeedbackAck {
    /// The unconditional success acknowledgment
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Accept a meeting id encoded as either a JSON string or a JSON number
///
/// The feed is not consistent about this, and flag keys must stay stable
/// across either encoding.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<MeetingId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}
