//! Raw rows of the inspections feed.
//!
//! Socrata omits a key entirely when the value is null, and depending on the
//! column type may send numbers either as JSON strings or as JSON numbers.
//! Every field is therefore optional and accepted in either form.

use serde::{Deserialize, Deserializer};

/// One row of the feed, exactly as served. Columns not listed here are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawInspection {
    #[serde(default, deserialize_with = "string_or_number")]
    pub dba_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub license_: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub facility_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub risk: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub zip: Option<String>,
    /// Floating timestamp, e.g. `"2019-02-12T00:00:00.000"`.
    #[serde(default, deserialize_with = "string_or_number")]
    pub inspection_date: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub inspection_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub results: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub longitude: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
