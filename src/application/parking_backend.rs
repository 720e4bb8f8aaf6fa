// Backend port for the parking monitor HTTP contract
use crate::domain::settings::SettingsPayload;
use crate::domain::snapshot::StatsSnapshot;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure of a `/stats` poll. Recovered by the poll loop.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("stats request failed: {0}")]
    Transport(String),
    #[error("stats request returned status {0}")]
    Status(u16),
    #[error("could not decode stats response: {0}")]
    Decode(String),
    #[error("stats request timed out after {0:?}")]
    TimedOut(Duration),
}

/// Failure of an operator command. Surfaced to the operator, never retried.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandError {
    #[error("{command} request failed: {reason}")]
    Transport { command: &'static str, reason: String },
    #[error("{command} request returned status {status}")]
    Status { command: &'static str, status: u16 },
    #[error("could not decode {command} response: {reason}")]
    Decode { command: &'static str, reason: String },
    #[error("{command} rejected by server with status {status:?}")]
    Rejected { command: &'static str, status: String },
    #[error("{command} needs the {surface} surface, which this page does not have")]
    MissingSurface {
        command: &'static str,
        surface: &'static str,
    },
}

#[async_trait]
pub trait ParkingBackend: Send + Sync {
    /// Fetch the latest occupancy snapshot
    async fn fetch_stats(&self) -> Result<StatsSnapshot, FetchError>;

    /// Ask the backend to analyze `source`; returns the source it actually selected
    async fn switch_source(&self, source: &str) -> Result<String, CommandError>;

    /// Persist detection settings; returns the server's status string
    async fn save_settings(&self, payload: &SettingsPayload) -> Result<String, CommandError>;
}
