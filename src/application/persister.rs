use crate::application::store::ReduxStore;
use crate::domain::ports::PersistedStateStore;
use crate::error::Result;
use tracing::debug;

/// Writes the current state of every slice that declares a storage key.
///
/// Returns the number of slices written. Stops at the first storage error.
pub async fn persist_store(
    store: &ReduxStore,
    persistence: &dyn PersistedStateStore,
) -> Result<usize> {
    let slices = store.persistable_slices();
    let count = slices.len();

    for (storage_key, state) in slices {
        debug!(storage_key = %storage_key, "persisting slice");
        persistence.persist_state(&storage_key, state).await?;
    }

    Ok(count)
}
