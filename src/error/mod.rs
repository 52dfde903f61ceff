mod fetch;
mod storage;

pub use fetch::FetchError;
pub use storage::StorageError;

use std::path::PathBuf;
use thiserror::Error as ThisError;

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

/// Failure of one reconciliation cycle as a whole.
///
/// Per-comic failures never surface here; they are counted in the cycle
/// report instead.
#[derive(Debug, ThisError)]
pub enum SyncError {
    #[error("Failed to fetch latest comic: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to extract configuration: {0}")]
    Extract(Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Extract(Box::new(err))
    }
}

#[derive(Debug, ThisError)]
pub enum TransformError {
    #[error("failed to spawn `{program} {step}`: {source}")]
    Spawn {
        program: String,
        step: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program} {step}` exited with {status}")]
    StepFailed {
        program: String,
        step: String,
        status: std::process::ExitStatus,
    },

    #[error("no transform steps configured")]
    NoSteps,
}
