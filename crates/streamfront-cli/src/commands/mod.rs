pub mod admin;
pub mod auth;
pub mod catalog;
pub mod profile;
pub mod route;
pub mod watchlist;

use anyhow::anyhow;
use streamfront_core::StreamfrontError;
use streamfront_core::api::ApiError;

/// Turns a remote failure into the message a user should see.
pub fn api_failure(err: ApiError, fallback: &str) -> anyhow::Error {
    anyhow!(err.message_or(fallback))
}

pub fn failure(err: StreamfrontError, fallback: &str) -> anyhow::Error {
    anyhow!(err.user_message(fallback))
}
