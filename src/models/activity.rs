use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// One outbound/locally mirrored activity entry. Context keys (ip, timezone,
// user fields, ...) sit at the top level of the serialized object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub timestamp: DateTime<Utc>,

    pub event: String,

    pub message: String,

    #[serde(flatten)]
    pub context: Map<String, Value>,
}

impl Activity {
    pub fn new(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            event: event.into(),
            message: message.into(),
            context: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.context.insert(key.to_string(), value);
        self
    }

    pub fn extend(&mut self, fields: Map<String, Value>) {
        for (key, value) in fields {
            self.context.insert(key, value);
        }
    }
}
