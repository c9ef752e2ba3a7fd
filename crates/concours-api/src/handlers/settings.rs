//! Site settings endpoints

use axum::{extract::{Multipart, State}, Json};
use chrono::Utc;
use concours_db::entities::setting;
use concours_media::AssetClass;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use std::sync::Arc;

use super::read_upload;
use crate::error::ApiError;
use crate::models::{ErrorResponse, SettingsResponse, UploadResponse};
use crate::AppState;

/// Read site settings (public; the login page shows the background)
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Site settings", body = SettingsResponse)
    ),
    tag = "settings"
)]
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let background = setting::Entity::find_by_id(setting::BACKGROUND_URL)
        .one(&state.db)
        .await?;

    Ok(Json(SettingsResponse {
        background_url: background.map(|s| s.value),
    }))
}

/// Upload or replace the site background image (admin)
#[utoipa::path(
    post,
    path = "/api/settings/background",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Background replaced", body = UploadResponse),
        (status = 400, description = "Missing or unsupported file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Image could not be processed", body = ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn upload_background(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let (data, content_type) = read_upload(multipart).await?;

    let previous = setting::Entity::find_by_id(setting::BACKGROUND_URL)
        .one(&state.db)
        .await?;

    // Write new
    let url = state
        .media
        .save(AssetClass::Background, data, &content_type)
        .await?;

    // Commit reference
    match previous.clone() {
        Some(row) => {
            let mut active = row.into_active_model();
            active.value = Set(url.clone());
            active.updated_at = Set(Utc::now());
            active.update(&state.db).await?;
        }
        None => {
            setting::ActiveModel {
                key: Set(setting::BACKGROUND_URL.to_string()),
                value: Set(url.clone()),
                updated_at: Set(Utc::now()),
            }
            .insert(&state.db)
            .await?;
        }
    }

    // Delete old, best effort
    if let Some(row) = previous {
        state.media.remove(&row.value).await;
    }

    Ok(Json(UploadResponse { url }))
}
