//! Infrastructure adapters for Streamfront.
//!
//! Concrete implementations of the core traits: file-backed and in-memory
//! key-value storage, the HTTP client for the remote API, media file loading,
//! configuration and path resolution.

pub mod config_service;
pub mod http;
pub mod media;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::http::HttpApiClient;
pub use crate::paths::StreamfrontPaths;
pub use crate::storage::{InMemoryKeyValueStore, JsonFileKeyValueStore};
