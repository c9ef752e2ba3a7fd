//! Self-service profile endpoints

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use concours_auth::{hash_password, verify_password, SessionPatch};
use concours_db::entities::user;
use concours_media::AssetClass;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use std::sync::Arc;
use tracing::info;

use super::{read_upload, validate_email, validate_password};
use crate::error::ApiError;
use crate::middleware::{session_cookie, CurrentUser};
use crate::models::{
    ChangePasswordRequest, ErrorResponse, UpdateProfileRequest, UploadResponse, User,
};
use crate::AppState;

async fn load_account(
    state: &AppState,
    current: &CurrentUser,
) -> Result<user::Model, ApiError> {
    user::Entity::find_by_id(current.id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::AuthRequired)
}

/// Update the caller's own profile
///
/// On success the live session is patched into a fresh token carrying the
/// new display fields, so the UI reflects the edit without a re-login.
#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Validation failure", body = ErrorResponse)
    ),
    tag = "profile"
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(ref email) = req.email {
        validate_email(email)?;
    }
    if let Some(ref display_name) = req.display_name {
        if display_name.trim().is_empty() {
            return Err(ApiError::Validation(
                "Display name must not be empty".to_string(),
            ));
        }
    }

    let account = load_account(&state, &current).await?;

    let mut active = account.into_active_model();
    if let Some(display_name) = req.display_name.clone() {
        active.display_name = Set(display_name);
    }
    if let Some(email) = req.email.clone() {
        active.email = Set(email);
    }
    if let Some(phone) = req.phone {
        active.phone = Set(Some(phone));
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    // Re-sign the held session so it reflects the edit
    let token = state.keys.patch(
        &current.claims,
        SessionPatch {
            name: req.display_name,
            email: req.email,
            ..Default::default()
        },
    )?;

    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(User::from(updated)),
    ))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/api/profile/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Validation failure", body = ErrorResponse)
    ),
    tag = "profile"
)]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let account = load_account(&state, &current).await?;

    if !verify_password(&req.current_password, &account.password_hash) {
        return Err(ApiError::Validation(
            "Current password is incorrect".to_string(),
        ));
    }
    validate_password(&req.new_password)?;

    let password_hash =
        hash_password(&req.new_password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut active = account.into_active_model();
    active.password_hash = Set(password_hash);
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;

    info!("Account '{}' changed password", current.claims.username);

    Ok(StatusCode::NO_CONTENT)
}

/// Upload or replace the caller's avatar
///
/// Ordering: the new file is written first, then the database row moves to
/// it, then the previous file is deleted best-effort. A crash in between
/// leaves at worst an orphaned file, never a row pointing at nothing.
#[utoipa::path(
    post,
    path = "/api/profile/avatar",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar replaced", body = UploadResponse),
        (status = 400, description = "Missing or unsupported file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Image could not be processed", body = ErrorResponse)
    ),
    tag = "profile"
)]
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (data, content_type) = read_upload(multipart).await?;

    let account = load_account(&state, &current).await?;
    let previous = account.avatar_url.clone();

    // Write new
    let url = state
        .media
        .save(AssetClass::Avatar, data, &content_type)
        .await?;

    // Commit reference
    let mut active = account.into_active_model();
    active.avatar_url = Set(Some(url.clone()));
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;

    // Delete old, best effort
    if let Some(previous) = previous {
        state.media.remove(&previous).await;
    }

    let token = state.keys.patch(
        &current.claims,
        SessionPatch {
            avatar: Some(Some(url.clone())),
            ..Default::default()
        },
    )?;

    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(UploadResponse { url }),
    ))
}
