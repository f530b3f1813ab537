//! Storage adapters implementing the domain ports.

pub mod in_memory;
pub mod local_storage;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
