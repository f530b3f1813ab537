use crate::domain::action::Action;
use crate::domain::ports::Store;
use crate::domain::reducer::ReducerDescriptor;
use crate::error::{RehydrateError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace, warn};

type Subscriber = Arc<dyn Fn(&Value) + Send + Sync>;

struct Slice {
    reducer: ReducerDescriptor,
    state: Value,
}

/// An in-process store holding one state slice per registered reducer.
///
/// Every dispatched action is offered to every slice. Clones share the same
/// slices and subscribers.
#[derive(Clone, Default)]
pub struct ReduxStore {
    slices: Arc<Mutex<BTreeMap<String, Slice>>>,
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ReduxStore {
    /// Creates an empty store with no slices.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full state as a JSON object keyed by slice key.
    pub fn state(&self) -> Value {
        let slices = lock(&self.slices);
        let state: Map<String, Value> = slices
            .iter()
            .map(|(key, slice)| (key.clone(), slice.state.clone()))
            .collect();
        Value::Object(state)
    }

    pub fn slice(&self, key: &str) -> Option<Value> {
        lock(&self.slices).get(key).map(|slice| slice.state.clone())
    }

    pub fn has_slice(&self, key: &str) -> bool {
        lock(&self.slices).contains_key(key)
    }

    /// Registers a callback invoked with the full state after every dispatch.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        lock(&self.subscribers).push(Arc::new(callback));
    }

    /// `(storage_key, state)` for every slice whose reducer declares a storage key.
    pub fn persistable_slices(&self) -> Vec<(String, Value)> {
        lock(&self.slices)
            .values()
            .filter_map(|slice| {
                slice
                    .reducer
                    .storage_key()
                    .map(|storage_key| (storage_key.to_string(), slice.state.clone()))
            })
            .collect()
    }

    fn notify(&self) {
        let state = self.state();
        // Callbacks run outside the lock so they may read or dispatch.
        let subscribers: Vec<Subscriber> = lock(&self.subscribers).clone();
        for subscriber in subscribers {
            subscriber(&state);
        }
    }
}

impl Store for ReduxStore {
    /// Re-registering the same descriptor is a no-op; a different reducer
    /// under an existing key is rejected.
    fn add_reducer(&self, key: &str, reducer: ReducerDescriptor) -> Result<()> {
        let mut slices = lock(&self.slices);

        if let Some(existing) = slices.get(key) {
            if existing.reducer.same_as(&reducer) {
                debug!(key, "reducer already registered");
                return Ok(());
            }
            warn!(key, "conflicting reducer registration rejected");
            return Err(RehydrateError::DuplicateReducer {
                key: key.to_string(),
            });
        }

        let state = reducer.reduce(None, &Action::init());
        debug!(key, storage_key = ?reducer.storage_key(), "reducer attached");
        slices.insert(key.to_string(), Slice { reducer, state });
        Ok(())
    }

    fn dispatch(&self, action: Action) {
        trace!(action = %action.r#type, "dispatch");
        {
            let mut slices = lock(&self.slices);
            for slice in slices.values_mut() {
                slice.state = slice.reducer.reduce(Some(&slice.state), &action);
            }
        }
        self.notify();
    }
}
