mod basic;
mod database;
mod poll;
mod source;
mod transform;

pub use basic::BasicConfig;
pub use database::DatabaseConfig;
pub use poll::PollConfig;
pub use source::SourceConfig;
pub use transform::TransformConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::ConfigError;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Logging (see `basic` table in comicsync.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Comic API client settings (see `source` table).
    #[serde(default)]
    pub source: SourceConfig,

    /// Storage connection settings (see `database` table).
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Polling loop settings (see `poll` table).
    #[serde(default)]
    pub poll: PollConfig,

    /// Downstream transformation tool (see `transform` table).
    #[serde(default)]
    pub transform: TransformConfig,
}

pub const DEFAULT_CONFIG_FILE: &str = "comicsync.toml";

const ENV_PREFIX: &str = "COMICSYNC_";

/// Plain connection variables kept for existing deployments.
const LEGACY_DB_VARS: [&str; 5] = ["DB_HOST", "DB_PORT", "DB_NAME", "DB_USER", "DB_PASSWORD"];

impl Config {
    /// Builds a Figment that merges, in increasing priority: defaults, the TOML file,
    /// legacy `DB_*` variables and `COMICSYNC_*` variables (`__` separates nesting).
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if path.is_file() {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::raw().only(&LEGACY_DB_VARS).map(|key| {
                let field = key.as_str().to_ascii_lowercase();
                let field = field.strip_prefix("db_").unwrap_or(&field);
                format!("database.{field}").into()
            }))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads and validates configuration. An explicitly given file must exist; the
    /// default `comicsync.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path.filter(|p| !p.is_file()) {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        let cfg: Self = Self::figment(path).extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.poll.validate()?;
        self.source.validate()?;
        Ok(())
    }
}

/// Accepts strings and numbers (env providers turn `1377` into an integer).
pub(crate) fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom("expected a string or a number")),
    }
}
