use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::deserialize_string_lax;
use crate::error::ConfigError;

/// Storage configuration managed by Figment.
///
/// Either `url` is set (a `postgres://` or `sqlite:` URL), or the discrete
/// Postgres fields are used. The legacy `DB_HOST`/`DB_PORT`/`DB_NAME`/`DB_USER`/
/// `DB_PASSWORD` variables map onto the discrete fields.
#[derive(Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Full connection URL; overrides the discrete fields when set.
    /// TOML: `database.url`. Example: `sqlite://comics.db`.
    #[serde(default)]
    pub url: Option<String>,

    /// TOML: `database.host`. Default: `localhost`.
    #[serde(default = "default_host")]
    pub host: String,

    /// TOML: `database.port`. Default: `5432`.
    #[serde(default = "default_port")]
    pub port: u16,

    /// TOML: `database.name`. Default: `xkcd_db`.
    #[serde(default = "default_name", deserialize_with = "deserialize_string_lax")]
    pub name: String,

    /// Required unless `url` is set.
    /// TOML: `database.user`.
    #[serde(default, deserialize_with = "deserialize_string_lax")]
    pub user: String,

    /// TOML: `database.password`.
    #[serde(default, deserialize_with = "deserialize_string_lax")]
    pub password: String,

    /// Seconds allowed for establishing a connection.
    /// TOML: `database.connect_timeout_secs`. Default: `10`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Short, credential-free description for logs.
    pub fn describe(&self) -> String {
        match self.url.as_deref() {
            Some(url) if url.starts_with("sqlite:") => url.to_string(),
            Some(_) => "<database.url>".to_string(),
            None => format!("postgres://{}:{}/{}", self.host, self.port, self.name),
        }
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = self.url.as_deref() {
            if url.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "database.url must not be empty when set".to_string(),
                ));
            }
            return Ok(());
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "database.name (DB_NAME) must be set and non-empty".to_string(),
            ));
        }
        if self.user.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "database.user (DB_USER) must be set and non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_host(),
            port: default_port(),
            name: default_name(),
            // No default user. `Config::validate()` enforces one.
            user: String::new(),
            password: String::new(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_name() -> String {
    "xkcd_db".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}
