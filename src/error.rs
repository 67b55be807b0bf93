use thiserror::Error;

/// Match tracker error types
#[derive(Error, Debug, Clone)]
pub enum TrackerError {
    #[error("Session already running")]
    AlreadyRunning,

    #[error("Session not running")]
    NotRunning,

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
