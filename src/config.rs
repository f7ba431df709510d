//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;

/// Default base URL for the scored meeting feed
pub const DEFAULT_FEED_BASE_URL: &str =
    "https://raw.githubusercontent.com/katewilkinson17/-meeting-tracker/main/backend/data";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Feed client configuration
    pub feed: FeedConfig,
    /// Flag storage configuration
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Feed client configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL of the remote feed (overridable for staging or tests)
    pub base_url: String,
    /// Artificial minimum latency for story fetches (in milliseconds)
    pub story_delay_ms: u64,
    /// Artificial minimum latency for meeting fetches (in milliseconds)
    pub meeting_delay_ms: u64,
}

/// Flag storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path to the JSON document holding the user's flags
    pub flags_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            feed: FeedConfig {
                base_url: env::var("FEED_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_FEED_BASE_URL.to_string()),
                story_delay_ms: env::var("STORY_FETCH_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(500),
                meeting_delay_ms: env::var("MEETING_FETCH_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(800),
            },
            storage: StorageConfig {
                flags_path: env::var("FLAGS_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| crate::state::JsonFlagStore::default_path()),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_addr_format() {
        let config = Config {
            server: ServerConfig {
                port: 3000,
                host: "127.0.0.1".to_string(),
            },
            feed: FeedConfig {
                base_url: "http://localhost:9999".to_string(),
                story_delay_ms: 0,
                meeting_delay_ms: 0,
            },
            storage: StorageConfig {
                flags_path: PathBuf::from("flags.json"),
            },
        };
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
    }
}
