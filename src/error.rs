use thiserror::Error;

/// Errors raised at the configuration and recording edges.
///
/// The per-cycle pipeline never produces these.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
