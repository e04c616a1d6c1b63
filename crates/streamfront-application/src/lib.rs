//! Application layer for Streamfront.
//!
//! Orchestrates the core traits into the components the rest of the client
//! talks to: the [`SessionStore`], the reactive route gate and the profile and
//! watchlist flows that write back through the store.

pub mod gate_watcher;
pub mod profile_service;
pub mod session_store;
pub mod watchlist;

pub use gate_watcher::GateWatcher;
pub use profile_service::ProfileService;
pub use session_store::SessionStore;
pub use watchlist::WatchlistService;
