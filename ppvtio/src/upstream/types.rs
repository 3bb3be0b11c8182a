use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::{Number, Value};

/// Body of `GET /api/streams`.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamListing {
    pub streams: Vec<CategoryGroup>,
}

impl StreamListing {
    pub fn from_json(body: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

/// One upstream grouping of streams, e.g. a sport or league.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryGroup {
    #[serde(default, deserialize_with = "lenient_label")]
    pub category: Option<String>,
    #[serde(default)]
    pub streams: Vec<StreamItem>,
}

/// A single live event.
///
/// Only `id` is required; the upstream occasionally omits the other fields
/// and a single sparse entry should not discard the whole listing.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    /// Page embedding the player, scraped for the playlist URL.
    #[serde(default)]
    pub iframe: Option<String>,
    #[serde(default)]
    pub uri_name: Option<String>,
    /// Epoch seconds. Numeric strings are accepted; anything else is `None`.
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub starts_at: Option<f64>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(number_label(&n)),
        other => Err(D::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}

fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(number_label(&n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|secs| secs.is_finite()))
}

/// Integral floats print without a fraction, so `1.0` and `1` label alike.
fn number_label(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}
