use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `info.0.json` (both the latest and the per-comic endpoint).
///
/// Only `num` and `title` are required to decode. The remaining record
/// fields are checked when a payload is turned into a stored comic, so a
/// single incomplete comic does not poison an entire batch.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ComicInfo {
    pub num: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_title: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    /// Upstream sends these as strings ("2009"); numbers are accepted too.
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub month: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

fn deserialize_opt_string_lax<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(serde::de::Error::custom(
            "expected a string or a number for a date component",
        )),
    }
}
