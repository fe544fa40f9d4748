// Remote feature-configuration document.
// The body is kept verbatim; only the cache timestamp is interpreted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A feature-configuration document plus the time it was last fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// When the document was last fetched from the network.
    #[serde(rename = "cachedDate", default, skip_serializing_if = "Option::is_none")]
    pub cached_date: Option<DateTime<Utc>>,
    /// The document body as served.
    #[serde(flatten)]
    pub document: Map<String, Value>,
}

impl FeatureConfig {
    /// Top-level `version` field, if the document carries one.
    pub fn version(&self) -> Option<u64> {
        self.document.get("version").and_then(Value::as_u64)
    }

    /// Look up a value by dotted path, e.g. `ios.0.yir.isEnabled`.
    /// Numeric segments index into arrays.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.document.get(segments.next()?)?;

        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// Boolean flag at a dotted path. Non-boolean values read as `None`.
    pub fn flag(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }
}
