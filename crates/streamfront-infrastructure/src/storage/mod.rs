//! Persisted storage adapters.

pub mod atomic_json;
mod file_kv_store;
mod memory_kv_store;

pub use file_kv_store::JsonFileKeyValueStore;
pub use memory_kv_store::InMemoryKeyValueStore;
