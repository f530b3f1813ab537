use crate::domain::ports::KeyValueStorage;
use crate::error::{RehydrateError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family holding persisted slice snapshots.
pub const CF_STATE: &str = "state";

/// A persistent key-value storage using RocksDB.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStorage {
    db: Arc<DB>,
}

impl RocksDBStorage {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "state" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_state = ColumnFamilyDescriptor::new(CF_STATE, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_state])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn state_cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_STATE).ok_or_else(|| {
            RehydrateError::InternalError(Box::new(std::io::Error::other(
                "State column family not found",
            )))
        })
    }
}

#[async_trait]
impl KeyValueStorage for RocksDBStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.state_cf()?;
        Ok(self.db.get_cf(cf, key.as_bytes())?)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let cf = self.state_cf()?;
        self.db.put_cf(cf, key.as_bytes(), value)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let cf = self.state_cf()?;
        self.db.delete_cf(cf, key.as_bytes())?;
        Ok(())
    }
}
