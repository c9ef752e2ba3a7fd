//! Authentication endpoints: register, login, logout, current account

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use concours_auth::{hash_password, verify_password, SessionClaims};
use concours_db::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{validate_email, validate_password, validate_username};
use crate::error::ApiError;
use crate::middleware::{clear_session_cookie, session_cookie, CurrentUser};
use crate::models::{
    ErrorResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User,
};
use crate::AppState;

/// Session snapshot for a freshly authenticated account
pub(crate) fn claims_for(account: &user::Model) -> SessionClaims {
    SessionClaims::new(
        account.id.to_string(),
        account.username.clone(),
        account.display_name.clone(),
        account.email.clone(),
        account.role.into(),
    )
    .with_avatar(account.avatar_url.clone())
}

/// Register a new account
///
/// Self-registration always produces a regular `user` account; any role
/// field smuggled into the request body is ignored.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 409, description = "Username taken", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.allow_signup {
        return Err(ApiError::Validation(
            "Self-registration is disabled".to_string(),
        ));
    }

    validate_username(&req.username)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&req.username))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict {
            field: "username",
            value: req.username,
        });
    }

    let password_hash =
        hash_password(&req.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let account = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(req.username),
        password_hash: Set(password_hash),
        display_name: Set(req.display_name),
        email: Set(req.email),
        phone: Set(req.phone),
        role: Set(user::UserRole::User),
        is_active: Set(true),
        avatar_url: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    info!("Registered new account '{}'", account.username);

    let token = state.keys.issue(&claims_for(&account))?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(RegisterResponse {
            user: account.into(),
            token,
        }),
    ))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = user::Entity::find()
        .filter(user::Column::Username.eq(&req.username))
        .one(&state.db)
        .await?;

    // One failure surface for unknown user, wrong password and deactivated
    // account; callers cannot enumerate usernames through login.
    let Some(account) = account else {
        return Err(ApiError::InvalidCredentials);
    };
    if !account.is_active || !verify_password(&req.password, &account.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.keys.issue(&claims_for(&account))?;
    info!("Account '{}' logged in", account.username);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(LoginResponse {
            user: account.into(),
            token,
        }),
    ))
}

/// Log out
///
/// Sessions are client-held tokens; instructing the client to drop the
/// cookie is the whole of revocation.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session cookie cleared")
    ),
    tag = "auth"
)]
pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_session_cookie())],
    )
}

/// Return the authenticated account
///
/// Reads the database rather than echoing the token, so an admin-side role
/// change or deactivation is visible here before the token expires.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = User),
        (status = 303, description = "Not authenticated")
    ),
    tag = "auth"
)]
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<User>, ApiError> {
    let account = user::Entity::find_by_id(current.id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::AuthRequired)?;

    if !account.is_active {
        return Err(ApiError::AuthRequired);
    }

    Ok(Json(account.into()))
}
