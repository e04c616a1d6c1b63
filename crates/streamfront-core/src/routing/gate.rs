//! Route Authorization Gate.
//!
//! Each guarded route owns a [`RouteGate`] fixed at registration. The gate is a
//! pure function of the session snapshot:
//!
//! ```text
//! resolution == Unresolved          -> Pending   (loading indicator, no redirect)
//! Protected, not authenticated      -> Denied    (redirect to landing)
//! Protected, role does not match    -> Denied    (redirect to catalog)
//! PublicOnly, authenticated         -> Denied    (redirect to catalog)
//! otherwise                         -> Allowed
//! ```

use std::fmt;

use serde::Serialize;

use super::table::{CATALOG_ROUTE, LANDING_ROUTE};
use crate::session::{Role, SessionSnapshot};

/// How a route is guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RouteAccess {
    /// Not wrapped by the gate; renders for everyone, even before resolution.
    Open,
    /// Requires a session, and optionally a specific role.
    Protected { required_role: Option<Role> },
    /// Only for anonymous visitors (sign-in, sign-up).
    PublicOnly,
}

impl RouteAccess {
    pub const fn protected() -> Self {
        Self::Protected {
            required_role: None,
        }
    }

    pub const fn requires_role(role: Role) -> Self {
        Self::Protected {
            required_role: Some(role),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DenyReason {
    Unauthenticated,
    AlreadyAuthenticated,
    InsufficientRole { required: Role },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => f.write_str("sign-in required"),
            Self::AlreadyAuthenticated => f.write_str("already signed in"),
            Self::InsufficientRole { required } => write!(f, "role {} required", required),
        }
    }
}

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum GateState {
    /// Session not resolved yet; show a neutral loading state.
    Pending,
    /// Redirect instead of rendering.
    Denied {
        redirect_to: &'static str,
        reason: DenyReason,
    },
    /// Render the requested page unchanged.
    Allowed,
}

impl GateState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::Denied { redirect_to, .. } => Some(*redirect_to),
            _ => None,
        }
    }
}

/// Gate bound to one route's access rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteGate {
    access: RouteAccess,
}

impl RouteGate {
    pub const fn new(access: RouteAccess) -> Self {
        Self { access }
    }

    pub fn access(&self) -> RouteAccess {
        self.access
    }

    pub fn evaluate(&self, snapshot: &SessionSnapshot) -> GateState {
        if matches!(self.access, RouteAccess::Open) {
            return GateState::Allowed;
        }
        if !snapshot.is_resolved() {
            return GateState::Pending;
        }

        match self.access {
            RouteAccess::Open => GateState::Allowed,
            RouteAccess::Protected { required_role } => {
                let Some(identity) = snapshot.identity() else {
                    return GateState::Denied {
                        redirect_to: LANDING_ROUTE,
                        reason: DenyReason::Unauthenticated,
                    };
                };
                match required_role {
                    Some(required) if identity.role != required => GateState::Denied {
                        redirect_to: CATALOG_ROUTE,
                        reason: DenyReason::InsufficientRole { required },
                    },
                    _ => GateState::Allowed,
                }
            }
            RouteAccess::PublicOnly => {
                if snapshot.is_authenticated() {
                    GateState::Denied {
                        redirect_to: CATALOG_ROUTE,
                        reason: DenyReason::AlreadyAuthenticated,
                    }
                } else {
                    GateState::Allowed
                }
            }
        }
    }
}
