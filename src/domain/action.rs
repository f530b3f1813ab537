use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Emitted once by the store for every freshly attached slice.
pub const INIT: &str = "@@INIT";

/// Instructs the slice owning `storageKey` to adopt `storedState`.
pub const APPLY_STORED_STATE: &str = "APPLY_STORED_STATE";

/// A tagged record describing a state transition request.
///
/// On the wire an action is a flat JSON object with a `type` discriminator and
/// any number of extra fields, e.g.
/// `{ "type": "APPLY_STORED_STATE", "storageKey": "settings", "storedState": {..} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub r#type: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Borrowed view over an `APPLY_STORED_STATE` action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoredState<'a> {
    pub storage_key: &'a str,
    pub stored_state: &'a Value,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            r#type: kind.into(),
            payload: Map::new(),
        }
    }

    pub fn init() -> Self {
        Self::new(INIT)
    }

    pub fn apply_stored_state(storage_key: impl Into<String>, stored_state: Value) -> Self {
        Self::new(APPLY_STORED_STATE)
            .with("storageKey", Value::String(storage_key.into()))
            .with("storedState", stored_state)
    }

    /// Adds a payload field. `type` is reserved for the discriminator and is ignored.
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        let field = field.into();
        if field != "type" {
            self.payload.insert(field, value);
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }

    pub fn is(&self, kind: &str) -> bool {
        self.r#type == kind
    }

    /// Returns the rehydration payload if this is a well-formed
    /// `APPLY_STORED_STATE` action.
    pub fn stored_state(&self) -> Option<StoredState<'_>> {
        if !self.is(APPLY_STORED_STATE) {
            return None;
        }
        let storage_key = self.payload.get("storageKey")?.as_str()?;
        let stored_state = self.payload.get("storedState")?;
        Some(StoredState {
            storage_key,
            stored_state,
        })
    }
}
