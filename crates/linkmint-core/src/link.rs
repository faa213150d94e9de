use crate::shortcode::ShortCode;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A persisted mapping from an original URL to its short code.
///
/// Links are created once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Identifier assigned by the link store.
    pub id: u64,
    /// The normalized original URL.
    pub original_url: String,
    /// The short code assigned to the URL.
    pub short_code: ShortCode,
    /// When the link was created.
    pub created_at: Timestamp,
}

/// A link that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub original_url: String,
    pub short_code: ShortCode,
}

/// A denormalized `code -> url` pair mirrored into the secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryIndexRecord {
    pub short_code: String,
    pub original_url: String,
}

impl From<&Link> for SecondaryIndexRecord {
    fn from(link: &Link) -> Self {
        Self {
            short_code: link.short_code.to_string(),
            original_url: link.original_url.clone(),
        }
    }
}

/// A single click recorded by the redirect path.
///
/// The short code is a foreign key by value only: nothing guarantees it names
/// an existing link, and older writers may have omitted it entirely. Any extra
/// fields are kept verbatim in `metadata`.
///
/// Decoding never rejects a JSON object. A `short_code` that is not a string
/// and a `timestamp` that cannot be read as an instant stay in `metadata`
/// under their own key. Timestamps are accepted as RFC 3339, as a civil
/// datetime taken to be UTC, or as integer epoch seconds.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClickLogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ClickLogEntry {
    /// Creates a click for `code` stamped with the current time.
    pub fn now(code: &ShortCode) -> Self {
        Self {
            short_code: Some(code.to_string()),
            timestamp: Some(Timestamp::now()),
            metadata: Map::new(),
        }
    }

    /// Wraps a log item that is not a JSON object so it can still be counted.
    pub fn undecodable(raw: impl Into<String>) -> Self {
        Self::default().with_metadata(RAW_FIELD, raw.into())
    }

    /// Attaches a metadata field.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The short code if present and non-blank.
    pub fn code(&self) -> Option<&str> {
        self.short_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

const SHORT_CODE_FIELD: &str = "short_code";
const TIMESTAMP_FIELD: &str = "timestamp";
const RAW_FIELD: &str = "raw";

impl<'de> Deserialize<'de> for ClickLogEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut metadata = Map::<String, Value>::deserialize(deserializer)?;

        let short_code = match metadata.remove(SHORT_CODE_FIELD) {
            Some(Value::String(code)) => Some(code),
            Some(Value::Null) | None => None,
            Some(other) => {
                metadata.insert(SHORT_CODE_FIELD.to_string(), other);
                None
            }
        };

        let timestamp = match metadata.remove(TIMESTAMP_FIELD) {
            Some(Value::Null) | None => None,
            Some(raw) => match parse_timestamp(&raw) {
                Some(ts) => Some(ts),
                None => {
                    metadata.insert(TIMESTAMP_FIELD.to_string(), raw);
                    None
                }
            },
        };

        Ok(Self {
            short_code,
            timestamp,
            metadata,
        })
    }
}

fn parse_timestamp(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            s.parse::<Timestamp>().ok().or_else(|| {
                s.parse::<DateTime>()
                    .ok()
                    .and_then(|dt| dt.to_zoned(TimeZone::UTC).ok())
                    .map(|zoned| zoned.timestamp())
            })
        }
        Value::Number(n) => n.as_i64().and_then(|secs| Timestamp::from_second(secs).ok()),
        _ => None,
    }
}
