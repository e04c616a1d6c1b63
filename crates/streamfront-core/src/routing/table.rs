//! Registered routes of the storefront.

use std::collections::BTreeMap;

use super::gate::{RouteAccess, RouteGate};
use crate::session::Role;

/// Public landing page; anonymous visitors are sent here.
pub const LANDING_ROUTE: &str = "/";
/// Main catalog; signed-in users are sent here.
pub const CATALOG_ROUTE: &str = "/browse";

/// One registered route: a path pattern (`:name` segments capture) and its gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub pattern: &'static str,
    pub gate: RouteGate,
}

impl Route {
    pub const fn new(name: &'static str, pattern: &'static str, access: RouteAccess) -> Self {
        Self {
            name,
            pattern,
            gate: RouteGate::new(access),
        }
    }

    /// Matches `path` against the pattern, returning captured parameters.
    fn capture(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let pattern_segments: Vec<&str> = segments(self.pattern).collect();
        let path_segments: Vec<&str> = segments(path).collect();
        if pattern_segments.len() != path_segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (expected, actual) in pattern_segments.iter().zip(path_segments.iter()) {
            if let Some(name) = expected.strip_prefix(':') {
                params.insert(name.to_string(), (*actual).to_string());
            } else if expected != actual {
                return None;
            }
        }
        Some(params)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Strips query string and fragment.
fn strip_suffixes(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: Route,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The storefront's route registrations.
    pub fn storefront() -> Self {
        Self::new(vec![
            Route::new("landing", LANDING_ROUTE, RouteAccess::Open),
            Route::new("login", "/login", RouteAccess::PublicOnly),
            Route::new("register", "/register", RouteAccess::PublicOnly),
            Route::new("forgot-password", "/forgot-password", RouteAccess::Open),
            Route::new("browse", CATALOG_ROUTE, RouteAccess::protected()),
            Route::new("user-home", "/browse/user-home", RouteAccess::protected()),
            Route::new(
                "admin-dashboard",
                "/browse/admin-dashboard",
                RouteAccess::requires_role(Role::Admin),
            ),
            Route::new("video", "/browse/video/:id", RouteAccess::protected()),
            Route::new("watchlist", "/browse/watchlist", RouteAccess::protected()),
            Route::new("profile", "/browse/profile", RouteAccess::protected()),
        ])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// First registered route matching `path`; literal segments win over
    /// captures only through registration order.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = strip_suffixes(path);
        self.routes.iter().find_map(|route| {
            route.capture(path).map(|params| RouteMatch {
                route: *route,
                params,
            })
        })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::storefront()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_literal_routes() {
        let table = RouteTable::storefront();
        assert_eq!(table.resolve("/").unwrap().route.name, "landing");
        assert_eq!(table.resolve("/login").unwrap().route.name, "login");
        assert_eq!(table.resolve("/browse/").unwrap().route.name, "browse");
        assert_eq!(
            table.resolve("/browse/watchlist?sort=recent").unwrap().route.name,
            "watchlist"
        );
    }

    #[test]
    fn test_resolve_captures_parameters() {
        let table = RouteTable::storefront();
        let matched = table.resolve("/browse/video/42#t=10").unwrap();
        assert_eq!(matched.route.name, "video");
        assert_eq!(matched.param("id"), Some("42"));
    }

    #[test]
    fn test_unknown_path_has_no_route() {
        let table = RouteTable::storefront();
        assert!(table.resolve("/nope").is_none());
        assert!(table.resolve("/browse/video").is_none());
    }

    #[test]
    fn test_admin_dashboard_requires_admin_role() {
        let table = RouteTable::storefront();
        let route = table.resolve("/browse/admin-dashboard").unwrap().route;
        assert_eq!(route.gate.access(), RouteAccess::requires_role(Role::Admin));
    }
}
