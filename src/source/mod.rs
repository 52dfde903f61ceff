//! Source poller: HTTP access to the comic API.
//!
//! Every request is a single bounded-timeout GET; transient failures are retried
//! according to the client's [`RetryPolicy`].

mod retry;

pub use retry::RetryPolicy;

use comicsync_schema::ComicInfo;
use tracing::debug;
use url::Url;

use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::model::{Comic, ComicId, ComicSummary};
use crate::utils::logging::with_pretty_json_debug;

const INFO_DOCUMENT: &str = "info.0.json";

/// Upstream body characters kept in debug logs for non-2xx responses.
const BODY_PREVIEW_CHARS: usize = 256;

#[derive(Debug, Clone)]
pub struct XkcdClient {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl XkcdClient {
    pub fn new(cfg: &SourceConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.timeout());

        if let Some(proxy_url) = cfg.proxy.as_ref() {
            let proxy = reqwest::Proxy::all(proxy_url.as_str()).map_err(FetchError::ClientBuild)?;
            builder = builder.proxy(proxy);
        }

        let http = builder.build().map_err(FetchError::ClientBuild)?;
        Ok(Self::with_client(
            http,
            cfg.base_url.clone(),
            RetryPolicy::from_config(cfg),
        ))
    }

    pub fn with_client(http: reqwest::Client, base_url: Url, retry: RetryPolicy) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            retry,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn latest_url(&self) -> Result<Url, FetchError> {
        Ok(self.base_url.join(INFO_DOCUMENT)?)
    }

    pub fn item_url(&self, id: ComicId) -> Result<Url, FetchError> {
        Ok(self.base_url.join(&format!("{id}/{INFO_DOCUMENT}"))?)
    }

    /// Identifier and title of the most recently published comic.
    pub async fn fetch_latest(&self) -> Result<ComicSummary, FetchError> {
        let url = &self.latest_url()?;
        let info = self
            .retry
            .run("fetch_latest", move || self.get_info(url.clone()))
            .await?;
        debug!(latest = info.num, title = %info.title, "Fetched latest comic");
        Ok(ComicSummary::from(info))
    }

    /// One comic by identifier, validated into a storable record.
    pub async fn fetch_item(&self, id: ComicId) -> Result<Comic, FetchError> {
        let url = &self.item_url(id)?;
        let info = self
            .retry
            .run("fetch_item", move || self.get_info(url.clone()))
            .await?;
        if info.num != id {
            return Err(FetchError::IdMismatch {
                requested: id,
                received: info.num,
            });
        }
        Comic::try_from(info)
    }

    /// Single attempt: GET, status check, JSON decode.
    async fn get_info(&self, url: Url) -> Result<ComicInfo, FetchError> {
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|source| FetchError::Request {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            let raw_body = String::from_utf8_lossy(&bytes);
            debug!(
                %status,
                url = %url,
                body = %format!("{:.len$}", raw_body, len = BODY_PREVIEW_CHARS),
                "Upstream returned non-success status"
            );
            return Err(FetchError::UpstreamStatus { url, status });
        }

        let info: ComicInfo = serde_json::from_slice(&bytes)
            .map_err(|source| FetchError::MalformedBody { url, source })?;
        with_pretty_json_debug(&info, |json| {
            debug!(comic_id = info.num, body = %json, "Decoded comic payload");
        });
        Ok(info)
    }
}

/// `Url::join` replaces the last path segment unless the base ends with `/`.
fn normalize_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client(base: &str) -> XkcdClient {
        XkcdClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            RetryPolicy::new(0, Duration::ZERO),
        )
    }

    #[test]
    fn builds_upstream_urls() {
        let client = client("https://xkcd.com");
        assert_eq!(
            client.latest_url().unwrap().as_str(),
            "https://xkcd.com/info.0.json"
        );
        assert_eq!(
            client.item_url(614).unwrap().as_str(),
            "https://xkcd.com/614/info.0.json"
        );
    }

    #[test]
    fn base_path_without_trailing_slash_is_kept() {
        let client = client("http://mirror.test/xkcd");
        assert_eq!(client.base_url().as_str(), "http://mirror.test/xkcd/");
        assert_eq!(
            client.item_url(1).unwrap().as_str(),
            "http://mirror.test/xkcd/1/info.0.json"
        );
    }

    #[test]
    fn client_builds_from_default_config() {
        let client = XkcdClient::new(&SourceConfig::default()).expect("client should build");
        assert_eq!(client.base_url().as_str(), "https://xkcd.com/");
    }
}
