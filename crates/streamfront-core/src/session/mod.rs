//! Session domain module.
//!
//! This module contains the authenticated-session model and the codec used to
//! persist it between process runs.
//!
//! # Module Structure
//!
//! - `model`: Session snapshot, identity, role and credential types
//! - `persisted`: Storage keys and the versioned identity record
//!
//! # Usage
//!
//! ```ignore
//! use streamfront_core::session::{SessionSnapshot, Identity, Role, Credential};
//! use streamfront_core::session::{PersistedIdentity, TOKEN_KEY, USER_KEY};
//! ```

mod model;
mod persisted;

// Re-export public API
pub use model::{AuthSession, Credential, Identity, Resolution, Role, SessionSnapshot};
pub use persisted::{IDENTITY_SCHEMA_VERSION, PersistedIdentity, TOKEN_KEY, USER_KEY};
