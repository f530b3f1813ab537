use super::action::Action;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A pure state transition: `(current slice state, action) -> new slice state`.
///
/// `None` is passed as the state while the slice is being initialized.
pub type ReducerFn = Arc<dyn Fn(Option<&Value>, &Action) -> Value + Send + Sync>;

/// Validates or migrates a persisted value before it is handed back for rehydration.
/// Returning `None` discards the value.
pub type DeserializerFn = Arc<dyn Fn(Value) -> Option<Value> + Send + Sync>;

/// A reducer together with the metadata the registrar and the storage layer need.
///
/// Cloning is cheap and preserves identity, so a clone of a descriptor is
/// considered the same reducer by [`ReducerDescriptor::same_as`].
#[derive(Clone)]
pub struct ReducerDescriptor {
    reducer: ReducerFn,
    storage_key: Option<String>,
    deserializer: Option<DeserializerFn>,
}

impl ReducerDescriptor {
    pub fn new<F>(reducer: F) -> Self
    where
        F: Fn(Option<&Value>, &Action) -> Value + Send + Sync + 'static,
    {
        Self {
            reducer: Arc::new(reducer),
            storage_key: None,
            deserializer: None,
        }
    }

    /// Declares the storage key this slice is persisted under.
    ///
    /// The reducer is wrapped so that an `APPLY_STORED_STATE` action carrying
    /// this key replaces the slice with the stored state. Rehydration actions
    /// for other keys leave the slice untouched and never reach the inner reducer.
    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let own_key = storage_key.clone();
        let inner = Arc::clone(&self.reducer);

        self.reducer = Arc::new(move |state: Option<&Value>, action: &Action| {
            match action.stored_state() {
                Some(stored) if stored.storage_key == own_key => stored.stored_state.clone(),
                Some(_) => match state {
                    Some(current) => current.clone(),
                    None => inner(None, action),
                },
                None => inner(state, action),
            }
        });
        self.storage_key = Some(storage_key);
        self
    }

    pub fn with_deserializer<F>(mut self, deserializer: F) -> Self
    where
        F: Fn(Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.deserializer = Some(Arc::new(deserializer));
        self
    }

    /// The declared storage key. Empty keys count as undeclared.
    pub fn storage_key(&self) -> Option<&str> {
        self.storage_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn reduce(&self, state: Option<&Value>, action: &Action) -> Value {
        (self.reducer)(state, action)
    }

    /// Runs the deserialization hook, if any. Without a hook the value passes through.
    pub fn deserialize(&self, persisted: Value) -> Option<Value> {
        match &self.deserializer {
            Some(deserializer) => deserializer(persisted),
            None => Some(persisted),
        }
    }

    /// True if both descriptors were cloned from the same original.
    pub fn same_as(&self, other: &ReducerDescriptor) -> bool {
        Arc::ptr_eq(&self.reducer, &other.reducer) && self.storage_key == other.storage_key
    }
}

impl fmt::Debug for ReducerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReducerDescriptor")
            .field("storage_key", &self.storage_key)
            .field("deserializer", &self.deserializer.is_some())
            .finish_non_exhaustive()
    }
}
