use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Comic API client configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// API root; `info.0.json` and `{id}/info.0.json` are resolved against it.
    /// TOML: `source.base_url`. Default: `https://xkcd.com/`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Per-request timeout in seconds.
    /// TOML: `source.timeout_secs`. Default: `10`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds.
    /// TOML: `source.connect_timeout_secs`. Default: `5`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent upstream.
    /// TOML: `source.user_agent`.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional upstream HTTP proxy. If set, used for the reqwest client.
    /// TOML: `source.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Retries after the first attempt for transient failures.
    /// TOML: `source.retry_max_times`. Default: `3`.
    #[serde(default = "default_retry_max_times")]
    pub retry_max_times: usize,

    /// Constant delay between attempts, in milliseconds.
    /// TOML: `source.retry_delay_ms`. Default: `10000`.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "source.base_url `{}` cannot be used as a base URL",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "source.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            proxy: None,
            retry_max_times: default_retry_max_times(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("https://xkcd.com/").expect("valid xkcd base URL")
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("comicsync/{}", env!("CARGO_PKG_VERSION"))
}

fn default_retry_max_times() -> usize {
    3
}

fn default_retry_delay_ms() -> u64 {
    10_000
}
