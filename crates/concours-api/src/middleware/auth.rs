//! Session Authentication and Authorization Gate
//!
//! One middleware consumes the declarative route table in [`crate::access`]:
//! it resolves the session token from the request, checks the principal's
//! role against the route's required capability set, and injects the
//! [`CurrentUser`] context for handlers. Authorization is evaluated fresh on
//! every request from the resolved token, never cached; a token keeps its
//! issued role until it expires or is patched (documented staleness window).

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use concours_auth::SessionClaims;
use std::sync::Arc;
use uuid::Uuid;

use crate::{access, error::ApiError, AppState};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "concours_session";

/// Authenticated principal context extracted from the session token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Parsed subject id
    pub id: Uuid,
    /// Full claims snapshot, for patching after profile edits
    pub claims: SessionClaims,
}

/// Build the `Set-Cookie` value carrying a session token
///
/// HttpOnly keeps the token away from page scripts; the Max-Age mirrors the
/// token's own 24h expiry.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        concours_auth::SESSION_TTL_HOURS * 3600
    )
}

/// Build the `Set-Cookie` value that instructs the client to drop the token
///
/// With no server-side session table this is the whole of revocation.
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Extract the raw session token from cookie or Authorization header
///
/// Cookie first (the portal), bearer as fallback (API clients).
fn bearer_or_cookie(headers: &HeaderMap) -> Option<&str> {
    let from_cookie = headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(str::trim)
                .find_map(|c| c.strip_prefix("concours_session="))
        });

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
    })
}

/// Authorization gate applied to the whole API router
///
/// Routes absent from the access table pass through untouched. For gated
/// routes, a missing/invalid session and an insufficient role both resolve
/// to the same redirect; callers cannot tell the two cases apart.
pub async fn authorize(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let matched = request
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string());

    let required = matched
        .as_deref()
        .and_then(|path| access::required_roles(request.method(), path));

    let Some(required) = required else {
        // Public route (or fallback); no gate
        return Ok(next.run(request).await);
    };

    let claims = bearer_or_cookie(request.headers())
        .and_then(|token| state.keys.resolve(token))
        .ok_or(ApiError::AuthRequired)?;

    if !required.contains(claims.role) {
        return Err(ApiError::Forbidden);
    }

    let id = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::AuthRequired)?;
    request.extensions_mut().insert(CurrentUser { id, claims });

    Ok(next.run(request).await)
}
