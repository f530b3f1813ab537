use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A persisted slice state, stamped with the time it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    #[serde(rename = "_timestamp", with = "chrono::serde::ts_milliseconds")]
    pub saved_at: DateTime<Utc>,
    pub state: Value,
}

impl PersistedSnapshot {
    pub fn new(state: Value) -> Self {
        Self::stamped(state, Utc::now())
    }

    pub fn stamped(state: Value, saved_at: DateTime<Utc>) -> Self {
        Self { saved_at, state }
    }

    /// A snapshot older than `max_age` is treated as if it was never written.
    pub fn is_expired(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.saved_at > max_age
    }
}

/// Whether a persisted value counts as stored state.
///
/// `null`, `false`, zero and the empty string read as nothing stored.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
