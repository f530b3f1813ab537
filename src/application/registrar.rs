use crate::domain::action::Action;
use crate::domain::ports::{PersistedStateStoreHandle, StoreHandle};
use crate::domain::reducer::ReducerDescriptor;
use crate::domain::snapshot::is_present;
use crate::error::Result;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

/// The pending second phase of a registration: fetch persisted state and
/// dispatch it if present.
pub type Rehydrating = Pin<Box<dyn Future<Output = Result<Rehydration>> + Send + 'static>>;

/// Terminal state of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rehydration {
    /// The reducer declares no storage key.
    Skipped,
    /// A storage key is declared but nothing usable was stored under it.
    NotFound,
    /// `APPLY_STORED_STATE` was dispatched.
    Rehydrated,
}

/// Attaches `reducer` to `store` under `key` and returns the rehydration phase.
///
/// `add_reducer` runs before this function returns, so the slice is part of
/// the store before any `APPLY_STORED_STATE` for it can be dispatched. The
/// returned future performs the storage lookup; storage errors surface
/// through it unchanged and leave the reducer attached with its initial state.
pub fn register_reducer(
    store: &StoreHandle,
    persistence: &PersistedStateStoreHandle,
    key: &str,
    reducer: ReducerDescriptor,
) -> Result<Rehydrating> {
    store.add_reducer(key, reducer.clone())?;

    let store = Arc::clone(store);
    let persistence = Arc::clone(persistence);
    let key = key.to_string();

    Ok(Box::pin(rehydrate(store, persistence, key, reducer)))
}

async fn rehydrate(
    store: StoreHandle,
    persistence: PersistedStateStoreHandle,
    key: String,
    reducer: ReducerDescriptor,
) -> Result<Rehydration> {
    let Some(storage_key) = reducer.storage_key().map(str::to_string) else {
        debug!(key = %key, "no storage key, skipping rehydration");
        return Ok(Rehydration::Skipped);
    };

    let stored = persistence
        .get_persisted_state(&reducer, &storage_key)
        .await?;

    match stored {
        Some(stored_state) if is_present(&stored_state) => {
            debug!(key = %key, storage_key = %storage_key, "applying stored state");
            store.dispatch(Action::apply_stored_state(storage_key, stored_state));
            Ok(Rehydration::Rehydrated)
        }
        _ => {
            debug!(key = %key, storage_key = %storage_key, "nothing stored");
            Ok(Rehydration::NotFound)
        }
    }
}

/// A store and its persistence layer bound together, so feature modules only
/// supply a key and a reducer.
#[derive(Clone)]
pub struct ReducerRegistrar {
    store: StoreHandle,
    persistence: PersistedStateStoreHandle,
}

impl ReducerRegistrar {
    pub fn new(store: StoreHandle, persistence: PersistedStateStoreHandle) -> Self {
        Self { store, persistence }
    }

    /// See [`register_reducer`].
    pub fn register(&self, key: &str, reducer: ReducerDescriptor) -> Result<Rehydrating> {
        register_reducer(&self.store, &self.persistence, key, reducer)
    }

    /// Registers and awaits rehydration.
    pub async fn register_and_wait(
        &self,
        key: &str,
        reducer: ReducerDescriptor,
    ) -> Result<Rehydration> {
        self.register(key, reducer)?.await
    }
}
