use crate::domain::ports::{KeyValueStorage, PersistedStateStore};
use crate::domain::reducer::ReducerDescriptor;
use crate::domain::snapshot::{PersistedSnapshot, is_present};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use tracing::debug;

const KEY_PREFIX: &str = "redux-state";
const LOGGED_OUT: &str = "logged-out";

/// Snapshots older than this are ignored on lookup.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// Largest accepted maximum age, in days.
pub const MAX_AGE_DAYS_LIMIT: i64 = 36_500;

#[derive(Debug, Clone)]
pub struct LocalStorageConfig {
    /// Namespaces every key so sessions of different users never mix.
    pub user_id: Option<String>,
    pub max_age: Duration,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            user_id: None,
            max_age: Duration::days(DEFAULT_MAX_AGE_DAYS),
        }
    }
}

/// Persisted slice state on top of any [`KeyValueStorage`].
///
/// Values are stored as JSON [`PersistedSnapshot`] envelopes under
/// `redux-state-<user>:<storage key>`.
pub struct LocalStorage<K> {
    storage: K,
    config: LocalStorageConfig,
}

impl<K: KeyValueStorage> LocalStorage<K> {
    pub fn new(storage: K) -> Self {
        Self::with_config(storage, LocalStorageConfig::default())
    }

    pub fn with_config(storage: K, config: LocalStorageConfig) -> Self {
        Self { storage, config }
    }

    /// The backend key a storage key is persisted under.
    pub fn key_for(&self, storage_key: &str) -> String {
        let user = self.config.user_id.as_deref().unwrap_or(LOGGED_OUT);
        format!("{KEY_PREFIX}-{user}:{storage_key}")
    }

    /// Reads the raw envelope, regardless of age.
    pub async fn snapshot(&self, storage_key: &str) -> Result<Option<PersistedSnapshot>> {
        match self.storage.get(&self.key_for(storage_key)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn write_snapshot(
        &self,
        storage_key: &str,
        snapshot: &PersistedSnapshot,
    ) -> Result<()> {
        let bytes = serde_json::to_vec(snapshot)?;
        self.storage.set(&self.key_for(storage_key), bytes).await
    }

    pub async fn clear(&self, storage_key: &str) -> Result<()> {
        self.storage.remove(&self.key_for(storage_key)).await
    }
}

#[async_trait]
impl<K: KeyValueStorage> PersistedStateStore for LocalStorage<K> {
    async fn get_persisted_state(
        &self,
        reducer: &ReducerDescriptor,
        storage_key: &str,
    ) -> Result<Option<Value>> {
        let Some(snapshot) = self.snapshot(storage_key).await? else {
            return Ok(None);
        };

        if snapshot.is_expired(Utc::now(), self.config.max_age) {
            debug!(storage_key, saved_at = %snapshot.saved_at, "stored state expired");
            return Ok(None);
        }
        if !is_present(&snapshot.state) {
            return Ok(None);
        }

        let state = reducer.deserialize(snapshot.state);
        if state.is_none() {
            debug!(storage_key, "stored state rejected by reducer");
        }
        Ok(state)
    }

    async fn persist_state(&self, storage_key: &str, state: Value) -> Result<()> {
        self.write_snapshot(storage_key, &PersistedSnapshot::new(state))
            .await
    }
}
