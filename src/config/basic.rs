use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// `RUST_LOG` takes precedence when set.
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,

    /// Optional file receiving a copy of every log line (appended, no ANSI colors).
    /// TOML: `basic.log_file`. Example: `fetch_xkcd.log`. Default: unset.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            loglevel: default_loglevel(),
            log_file: None,
        }
    }
}

fn default_loglevel() -> String {
    "info".to_string()
}
