use super::action::Action;
use super::reducer::ReducerDescriptor;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// The capability set the registrar needs from an application store.
///
/// Both operations are synchronous and atomic from the caller's point of view.
pub trait Store: Send + Sync {
    /// Attaches `reducer` under `key`. Duplicate keys are handled by the
    /// implementation's own policy.
    fn add_reducer(&self, key: &str, reducer: ReducerDescriptor) -> Result<()>;
    fn dispatch(&self, action: Action);
}

/// Durable lookup and write of persisted slice state.
#[async_trait]
pub trait PersistedStateStore: Send + Sync {
    /// Returns the state previously persisted under `storage_key`, or `None`
    /// if nothing usable is stored.
    async fn get_persisted_state(
        &self,
        reducer: &ReducerDescriptor,
        storage_key: &str,
    ) -> Result<Option<Value>>;
    async fn persist_state(&self, storage_key: &str, state: Value) -> Result<()>;
}

/// Raw byte-oriented key-value storage backing a [`PersistedStateStore`].
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

pub type StoreHandle = Arc<dyn Store>;
pub type PersistedStateStoreHandle = Arc<dyn PersistedStateStore>;
pub type KeyValueStorageBox = Box<dyn KeyValueStorage>;

#[async_trait]
impl KeyValueStorage for KeyValueStorageBox {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}
