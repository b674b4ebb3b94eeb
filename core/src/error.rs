use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the tracker services.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A window, date, year or month argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A log entry violates the data-model invariants.
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    #[error("log {0} not found")]
    NotFound(Uuid),

    /// The backing store failed; the original error is kept as-is.
    #[error("log store unavailable: {0:#}")]
    StoreUnavailable(anyhow::Error),
}

impl TrackerError {
    pub fn store(err: anyhow::Error) -> Self {
        TrackerError::StoreUnavailable(err)
    }
}

pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
