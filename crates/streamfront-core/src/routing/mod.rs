//! Route authorization.
//!
//! - `gate`: per-route decision function ([`RouteGate`])
//! - `table`: the registered routes of the storefront and path matching

mod gate;
mod table;

pub use gate::{DenyReason, GateState, RouteAccess, RouteGate};
pub use table::{CATALOG_ROUTE, LANDING_ROUTE, Route, RouteMatch, RouteTable};
