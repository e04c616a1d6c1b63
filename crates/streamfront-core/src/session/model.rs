//! Session domain models.
//!
//! A session is either fully present (credential *and* identity) or absent.
//! [`SessionSnapshot`] makes the partial state unrepresentable by holding the
//! pair inside a single `Option<AuthSession>`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Role granted to an identity by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, Default)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Parses a role string sent by the server.
    ///
    /// Unknown roles map to [`Role::User`] so that no unrecognised value can
    /// ever grant admin rights.
    pub fn from_remote(value: &str) -> Self {
        value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("[Session] Unknown role '{}', treating as USER", value);
            Role::User
        })
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from_remote(&raw))
    }
}

/// Opaque bearer token proving authentication to the remote API.
///
/// `Debug` is redacted so the token never ends up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Profile attributes of the signed-in user, cached client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(alias = "email")]
    pub email_address: String,
    #[serde(alias = "fullName")]
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub favorite_categories: BTreeSet<String>,
    #[serde(default, alias = "avatar", skip_serializing_if = "Option::is_none")]
    pub avatar_reference: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Identity {
    /// Builds the identity returned by a login call.
    ///
    /// The login response does not carry verification or preference flags, so
    /// they start at their safe defaults: unverified, active, no favorites.
    pub fn from_login(
        email_address: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        avatar_reference: Option<String>,
    ) -> Self {
        Self {
            email_address: email_address.into(),
            display_name: display_name.into(),
            role,
            email_verified: false,
            active: true,
            favorite_categories: BTreeSet::new(),
            avatar_reference,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// An authenticated session: credential and identity always travel together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub credential: Credential,
    pub identity: Identity,
}

/// Whether the one-time persisted-session lookup has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Default)]
pub enum Resolution {
    #[default]
    Unresolved,
    Resolved,
}

/// Consistent, read-only view of the session at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub resolution: Resolution,
    pub session: Option<AuthSession>,
}

impl SessionSnapshot {
    /// Snapshot at process start: unresolved and empty.
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn resolved(session: Option<AuthSession>) -> Self {
        Self {
            resolution: Resolution::Resolved,
            session,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution == Resolution::Resolved
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// True iff the identity's role is ADMIN; false without a session.
    pub fn is_admin(&self) -> bool {
        self.identity().is_some_and(Identity::is_admin)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.as_ref().map(|s| &s.identity)
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.session.as_ref().map(|s| &s.credential)
    }
}
