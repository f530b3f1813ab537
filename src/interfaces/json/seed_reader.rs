use crate::error::{RehydrateError, Result};
use serde_json::{Map, Value};
use std::io::Read;

/// Reads persisted state seeds from a JSON source.
///
/// The source must be a single JSON object mapping storage keys to the state
/// that should be persisted under them, e.g. `{ "siteSettings": { "photon": true } }`.
pub struct SeedReader<R: Read> {
    source: R,
}

impl<R: Read> SeedReader<R> {
    /// Creates a new `SeedReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Parses the whole source into `(storage_key, state)` pairs, in key order.
    pub fn seeds(self) -> Result<Vec<(String, Value)>> {
        let value: Value = serde_json::from_reader(self.source)?;
        match value {
            Value::Object(entries) => Ok(into_pairs(entries)),
            other => Err(RehydrateError::InvalidSeed(format!(
                "expected a JSON object, found {}",
                kind_of(&other)
            ))),
        }
    }
}

fn into_pairs(entries: Map<String, Value>) -> Vec<(String, Value)> {
    entries.into_iter().collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reader_valid_object() {
        let data = r#"{ "siteSettings": { "photon": true }, "lazyImages": false }"#;
        let seeds = SeedReader::new(data.as_bytes()).seeds().unwrap();

        assert_eq!(
            seeds,
            vec![
                ("lazyImages".to_string(), json!(false)),
                ("siteSettings".to_string(), json!({ "photon": true })),
            ]
        );
    }

    #[test]
    fn test_reader_rejects_non_object() {
        let result = SeedReader::new("[1, 2]".as_bytes()).seeds();
        assert!(matches!(
            result,
            Err(RehydrateError::InvalidSeed(msg)) if msg.contains("an array")
        ));
    }

    #[test]
    fn test_reader_malformed_json() {
        let result = SeedReader::new("{ nope".as_bytes()).seeds();
        assert!(matches!(result, Err(RehydrateError::Serialization(_))));
    }
}
