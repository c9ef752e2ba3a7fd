//! Account administration endpoints (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use concours_auth::hash_password;
use concours_db::entities::{user, vehicle};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{validate_email, validate_password, validate_username};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::{CreateUserRequest, ErrorResponse, UpdateUserRequest, User, UserList};
use crate::AppState;

/// List all accounts
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All accounts", body = UserList)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserList>, ApiError> {
    let accounts = user::Entity::find()
        .order_by_asc(user::Column::Username)
        .all(&state.db)
        .await?;

    let total = accounts.len();
    let users = accounts.into_iter().map(User::from).collect();

    Ok(Json(UserList { users, total }))
}

/// Create an account with any role
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 409, description = "Username taken", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
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
        role: Set(req.role.into()),
        is_active: Set(true),
        avatar_url: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    info!(
        "Admin created account '{}' with role {}",
        account.username,
        concours_auth::Role::from(account.role).as_str()
    );

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Update an account, including role and active flag
///
/// A role change or deactivation does not touch tokens already in flight;
/// the affected account keeps its issued role until the token expires.
/// Deactivation is additionally enforced at the next login.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Account updated", body = User),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let account = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Account"))?;

    if let Some(ref email) = req.email {
        validate_email(email)?;
    }

    let mut active = account.into_active_model();
    if let Some(display_name) = req.display_name {
        active.display_name = Set(display_name);
    }
    if let Some(email) = req.email {
        active.email = Set(email);
    }
    if let Some(phone) = req.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(role) = req.role {
        active.role = Set(role.into());
    }
    if let Some(is_active) = req.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}

/// Delete an account
///
/// An administrator targeting their own account is a guarded no-op; the
/// generic delete route can never remove the caller. Owned asset files are
/// cleaned up best-effort after the row (and its cascades) are gone.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Attempted self-deletion", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if id == current.id {
        return Err(ApiError::Validation(
            "Administrators cannot delete their own account".to_string(),
        ));
    }

    let account = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Account"))?;

    // Collect asset references before the cascade removes the rows
    let avatar = account.avatar_url.clone();
    let photos: Vec<Option<String>> = vehicle::Entity::find()
        .filter(vehicle::Column::OwnerId.eq(account.id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|v| v.photo_url)
        .collect();

    let username = account.username.clone();
    account.delete(&state.db).await?;
    info!("Admin deleted account '{}'", username);

    // Reference removal is authoritative; file cleanup is advisory
    if let Some(avatar) = avatar {
        state.media.remove(&avatar).await;
    }
    for photo in photos.into_iter().flatten() {
        state.media.remove(&photo).await;
    }

    Ok(StatusCode::NO_CONTENT)
}
