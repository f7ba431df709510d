//! State management module
//!
//! Handles the dashboard snapshot, flag persistence, and refresh coordination.

pub mod dashboard;
pub mod flags;

pub use dashboard::{refresh, AppState, DashboardState, LoadPhase, RefreshOutcome, SharedState};
pub use flags::{FlagMap, FlagStore, InMemoryFlagStore, JsonFlagStore, StorageError};
