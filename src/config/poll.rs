use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// Continuous polling configuration managed by Figment.
///
/// The quiet period is a daily UTC window `[quiet_start, quiet_end)` during which
/// no cycle is started. A window whose start is after its end wraps past midnight.
/// Leaving either bound unset (or empty), or setting both to the same time,
/// disables pausing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    /// Seconds slept between cycles.
    /// TOML: `poll.interval_secs`. Default: `600`.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// TOML: `poll.quiet_start` (`HH:MM` or `HH:MM:SS`, UTC). Default: `23:50`.
    #[serde(default, deserialize_with = "deserialize_time_lax")]
    pub quiet_start: Option<NaiveTime>,

    /// TOML: `poll.quiet_end` (`HH:MM` or `HH:MM:SS`, UTC). Default: `00:00`.
    #[serde(default, deserialize_with = "deserialize_time_lax")]
    pub quiet_end: Option<NaiveTime>,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll.interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            quiet_start: NaiveTime::from_hms_opt(23, 50, 0),
            quiet_end: NaiveTime::from_hms_opt(0, 0, 0),
        }
    }
}

fn default_interval_secs() -> u64 {
    600
}

fn deserialize_time_lax<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map(Some)
        .map_err(|e| serde::de::Error::custom(format!("invalid time `{raw}` (expected HH:MM): {e}")))
}
