use std::time::Duration;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum StorageError {
    #[error("Failed to connect to {backend} database: {source}")]
    Connect {
        backend: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Connecting to {backend} database timed out after {after:?}")]
    ConnectTimeout {
        backend: &'static str,
        after: Duration,
    },

    #[error("Database query `{operation}` failed: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Invalid database target: {0}")]
    InvalidTarget(#[source] sqlx::Error),

    #[error("Comic id {0} does not fit the comic_id column")]
    IdOutOfRange(i64),
}

impl StorageError {
    pub(crate) fn query(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| StorageError::Query { operation, source }
    }

    pub(crate) fn connect(backend: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| StorageError::Connect { backend, source }
    }
}
