use reqwest::StatusCode;
use thiserror::Error as ThisError;
use url::Url;

use super::IsRetryable;
use crate::model::ComicId;

#[derive(Debug, ThisError)]
pub enum FetchError {
    #[error("HTTP request to {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("Upstream returned status {status} for {url}")]
    UpstreamStatus { url: Url, status: StatusCode },

    #[error("Malformed body from {url}: {source}")]
    MalformedBody {
        url: Url,
        #[source]
        source: serde_json::Error,
    },

    #[error("Comic {id} is missing field `{field}`")]
    MissingField { id: ComicId, field: &'static str },

    #[error("Comic {id} has an invalid publication date ({year}-{month}-{day})")]
    InvalidDate {
        id: ComicId,
        year: String,
        month: String,
        day: String,
    },

    #[error("Requested comic {requested} but upstream returned comic {received}")]
    IdMismatch {
        requested: ComicId,
        received: ComicId,
    },

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl FetchError {
    /// HTTP status carried by the error, when the upstream answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::UpstreamStatus { status, .. } => Some(*status),
            FetchError::Request { source, .. } => source.status(),
            _ => None,
        }
    }
}

impl IsRetryable for FetchError {
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Request { .. } => true,
            FetchError::UpstreamStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}
