use crate::domain::snapshot::TerminalSnapshot;
use crate::services::terminal_api::TerminalConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerminalApiError {
    #[error("resource not found")]
    NotFound,
    #[error("connection error: {0}")]
    Connection(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Config(#[from] TerminalConfigError),
}

/// Something that can provide the forecast inputs: yard counters from
/// telemetry plus the day's bookings.
pub trait SnapshotSource {
    async fn fetch_snapshot(&self) -> Result<TerminalSnapshot, TerminalApiError>;
}
