use thiserror::Error;

#[derive(Error, Debug)]
pub enum RehydrateError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),
    #[error("Reducer with key '{key}' is already registered")]
    DuplicateReducer { key: String },
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDB(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, RehydrateError>;
