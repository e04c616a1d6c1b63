//! reqwest-backed implementations of the remote gateway traits.
//!
//! One [`HttpApiClient`] implements every gateway; each file holds the
//! endpoints of one area.

mod admin;
mod auth;
mod catalog;
mod client;
mod multipart;
mod user;

pub use client::HttpApiClient;
