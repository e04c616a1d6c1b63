//! Persisted session layout.
//!
//! Two string entries in the key-value store:
//!
//! ```text
//! token -> raw credential string
//! user  -> {"schemaVersion":1,"emailAddress":..,"displayName":..,"role":..,
//!           "emailVerified":..,"active":..,"favoriteCategories":[..],
//!           "avatarReference":..}
//! ```

use serde::{Deserialize, Serialize};

use super::model::Identity;
use crate::error::{Result, StreamfrontError};

/// Storage key holding the raw credential.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the serialized identity record.
pub const USER_KEY: &str = "user";

/// Current version of the persisted identity record.
pub const IDENTITY_SCHEMA_VERSION: u32 = 1;

/// Versioned wrapper written under [`USER_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedIdentity {
    /// Records written before versioning carry no field and count as v1.
    #[serde(default = "legacy_version")]
    pub schema_version: u32,
    #[serde(flatten)]
    pub identity: Identity,
}

fn legacy_version() -> u32 {
    IDENTITY_SCHEMA_VERSION
}

impl PersistedIdentity {
    pub fn new(identity: Identity) -> Self {
        Self {
            schema_version: IDENTITY_SCHEMA_VERSION,
            identity,
        }
    }

    pub fn encode(identity: &Identity) -> Result<String> {
        Ok(serde_json::to_string(&Self::new(identity.clone()))?)
    }

    /// Parses a stored record, rejecting versions this build does not know.
    pub fn decode(raw: &str) -> Result<Identity> {
        let record: Self = serde_json::from_str(raw)?;
        if record.schema_version != IDENTITY_SCHEMA_VERSION {
            return Err(StreamfrontError::Serialization {
                format: "JSON".to_string(),
                message: format!(
                    "unsupported identity schema version {} (expected {})",
                    record.schema_version, IDENTITY_SCHEMA_VERSION
                ),
            });
        }
        Ok(record.identity)
    }
}
