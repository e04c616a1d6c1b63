//! Domain layer for Streamfront.
//!
//! Holds the session model, the remote-API contracts, the persistence seam and
//! the route authorization rules. Nothing in this crate performs I/O; adapters
//! live in `streamfront-infrastructure` and orchestration in
//! `streamfront-application`.

pub mod admin;
pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod routing;
pub mod session;
pub mod storage;
pub mod user;

// Re-export common error type
pub use error::{Result, StreamfrontError};
