//! Declarative route access table
//!
//! Every gated route declares its required capability set here; a single
//! middleware consumes the table. Routes absent from the table are public.
//! Ownership-scoped rules (edit my own profile, vendor edits own product)
//! are enforced in the handlers on top of the role check.

use axum::http::Method;
use concours_auth::{Role, RoleSet};

/// Judges and administrators
pub const JUDGING: RoleSet = RoleSet::of(&[Role::Admin, Role::Judge]);

/// Vendors and administrators
pub const VENDING: RoleSet = RoleSet::of(&[Role::Admin, Role::Vendor]);

/// Registrars and administrators
pub const REGISTRATION: RoleSet = RoleSet::of(&[Role::Admin, Role::Registrar]);

/// (method, matched route pattern, required roles)
///
/// Patterns use the axum matched-path form, so `{id}` segments compare
/// equal for every concrete request that hit the route.
pub const GATED_ROUTES: &[(&str, &str, RoleSet)] = &[
    // Session and profile
    ("GET", "/api/auth/me", RoleSet::ANY),
    ("PUT", "/api/profile", RoleSet::ANY),
    ("PUT", "/api/profile/password", RoleSet::ANY),
    ("POST", "/api/profile/avatar", RoleSet::ANY),
    // Vehicles
    ("GET", "/api/vehicles", RoleSet::ANY),
    ("POST", "/api/vehicles", RoleSet::ANY),
    ("GET", "/api/vehicles/{id}", RoleSet::ANY),
    ("PUT", "/api/vehicles/{id}", RoleSet::ANY),
    ("DELETE", "/api/vehicles/{id}", RoleSet::ANY),
    ("POST", "/api/vehicles/{id}/photo", RoleSet::ANY),
    // Judging
    ("POST", "/api/scores", JUDGING),
    ("GET", "/api/scores", JUDGING),
    // Vendor sales
    ("GET", "/api/products", RoleSet::ANY),
    ("POST", "/api/products", VENDING),
    ("PUT", "/api/products/{id}", VENDING),
    ("DELETE", "/api/products/{id}", VENDING),
    // Specialty voting
    ("POST", "/api/votes", RoleSet::ANY),
    ("GET", "/api/votes", RoleSet::ADMIN),
    // Judging classes
    ("GET", "/api/classes", RoleSet::ANY),
    ("POST", "/api/classes", RoleSet::ADMIN),
    ("DELETE", "/api/classes/{id}", RoleSet::ADMIN),
    // User administration
    ("GET", "/api/users", RoleSet::ADMIN),
    ("POST", "/api/users", RoleSet::ADMIN),
    ("PUT", "/api/users/{id}", RoleSet::ADMIN),
    ("DELETE", "/api/users/{id}", RoleSet::ADMIN),
    // Site settings
    ("POST", "/api/settings/background", RoleSet::ADMIN),
];

/// Look up the capability set a route requires, if it is gated at all
pub fn required_roles(method: &Method, matched_path: &str) -> Option<RoleSet> {
    GATED_ROUTES
        .iter()
        .find(|(m, path, _)| *m == method.as_str() && *path == matched_path)
        .map(|(_, _, required)| *required)
}
