use async_trait::async_trait;
use rehydrate::domain::action::Action;
use rehydrate::domain::ports::{PersistedStateStore, Store};
use rehydrate::domain::reducer::ReducerDescriptor;
use rehydrate::error::{RehydrateError, Result};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Everything the mocks observe, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddReducer(String),
    Dispatch(Action),
    FetchStarted(String),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().clone()
}

pub fn dispatches(log: &CallLog) -> Vec<Action> {
    calls(log)
        .into_iter()
        .filter_map(|call| match call {
            Call::Dispatch(action) => Some(action),
            _ => None,
        })
        .collect()
}

pub fn fetches(log: &CallLog) -> Vec<String> {
    calls(log)
        .into_iter()
        .filter_map(|call| match call {
            Call::FetchStarted(storage_key) => Some(storage_key),
            _ => None,
        })
        .collect()
}

pub fn add_reducer_count(log: &CallLog, key: &str) -> usize {
    calls(log)
        .iter()
        .filter(|call| matches!(call, Call::AddReducer(k) if k == key))
        .count()
}

/// A store that only records what it is asked to do.
pub struct RecordingStore {
    log: CallLog,
    reducers: Mutex<HashMap<String, ReducerDescriptor>>,
}

impl RecordingStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            reducers: Mutex::new(HashMap::new()),
        }
    }

    pub fn has_area(&self, key: &str) -> bool {
        self.reducers.lock().unwrap().contains_key(key)
    }
}

impl Store for RecordingStore {
    fn add_reducer(&self, key: &str, reducer: ReducerDescriptor) -> Result<()> {
        self.log.lock().unwrap().push(Call::AddReducer(key.to_string()));
        self.reducers.lock().unwrap().insert(key.to_string(), reducer);
        Ok(())
    }

    fn dispatch(&self, action: Action) {
        self.log.lock().unwrap().push(Call::Dispatch(action));
    }
}

#[derive(Clone)]
pub enum Lookup {
    Found(Value),
    Nothing,
    Fails(String),
}

/// Storage whose answers are fixed per storage key. Every lookup yields to the
/// runtime before answering so the result always arrives asynchronously.
pub struct MockStorage {
    log: CallLog,
    answers: HashMap<String, Lookup>,
}

impl MockStorage {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            answers: HashMap::new(),
        }
    }

    pub fn answer(mut self, storage_key: &str, lookup: Lookup) -> Self {
        self.answers.insert(storage_key.to_string(), lookup);
        self
    }
}

#[async_trait]
impl PersistedStateStore for MockStorage {
    async fn get_persisted_state(
        &self,
        _reducer: &ReducerDescriptor,
        storage_key: &str,
    ) -> Result<Option<Value>> {
        self.log
            .lock()
            .unwrap()
            .push(Call::FetchStarted(storage_key.to_string()));
        tokio::task::yield_now().await;

        match self.answers.get(storage_key) {
            Some(Lookup::Found(value)) => Ok(Some(value.clone())),
            Some(Lookup::Fails(message)) => Err(RehydrateError::Storage(message.clone())),
            Some(Lookup::Nothing) | None => Ok(None),
        }
    }

    async fn persist_state(&self, _storage_key: &str, _state: Value) -> Result<()> {
        Ok(())
    }
}

pub fn passthrough() -> ReducerDescriptor {
    ReducerDescriptor::new(|state, _action| state.cloned().unwrap_or_else(|| json!({})))
}
