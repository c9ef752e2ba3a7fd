//! Vehicle registration endpoints

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use concours_db::entities::{vehicle, vehicle_class};
use concours_media::AssetClass;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::read_upload;
use crate::access::REGISTRATION;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::{
    CreateVehicleRequest, ErrorResponse, UpdateVehicleRequest, UploadResponse, Vehicle,
    VehicleList,
};
use crate::AppState;

/// Owner may act on their own vehicle; registrars and admins on any
fn owner_or_registration(current: &CurrentUser, entry: &vehicle::Model) -> Result<(), ApiError> {
    if entry.owner_id == current.id || REGISTRATION.contains(current.claims.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

async fn load_vehicle(state: &AppState, id: Uuid) -> Result<vehicle::Model, ApiError> {
    vehicle::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Vehicle"))
}

/// List registered vehicles
#[utoipa::path(
    get,
    path = "/api/vehicles",
    responses(
        (status = 200, description = "All registered vehicles", body = VehicleList)
    ),
    tag = "vehicles"
)]
pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VehicleList>, ApiError> {
    let entries = vehicle::Entity::find()
        .order_by_asc(vehicle::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let total = entries.len();
    let vehicles = entries.into_iter().map(Vehicle::from).collect();

    Ok(Json(VehicleList { vehicles, total }))
}

/// Get a single vehicle
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    params(
        ("id" = Uuid, Path, description = "Vehicle ID")
    ),
    responses(
        (status = 200, description = "Vehicle", body = Vehicle),
        (status = 404, description = "Vehicle not found", body = ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vehicle>, ApiError> {
    let entry = load_vehicle(&state, id).await?;
    Ok(Json(entry.into()))
}

/// Register a vehicle owned by the caller
#[utoipa::path(
    post,
    path = "/api/vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = Vehicle),
        (status = 400, description = "Validation failure", body = ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<Vehicle>), ApiError> {
    if req.make.trim().is_empty() || req.model.trim().is_empty() {
        return Err(ApiError::Validation(
            "Make and model must not be empty".to_string(),
        ));
    }
    if !(1880..=2100).contains(&req.year) {
        return Err(ApiError::Validation(format!(
            "'{}' is not a plausible model year",
            req.year
        )));
    }

    if let Some(class_id) = req.class_id {
        vehicle_class::Entity::find_by_id(class_id)
            .one(&state.db)
            .await?
            .ok_or(ApiError::NotFound("Vehicle class"))?;
    }

    let entry = vehicle::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(current.id),
        class_id: Set(req.class_id),
        make: Set(req.make),
        model: Set(req.model),
        year: Set(req.year),
        description: Set(req.description),
        voter_number: Set(None),
        photo_url: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    info!("Vehicle '{} {}' registered", entry.make, entry.model);

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// Update a vehicle
///
/// Open to the owner and to registration staff, except the voter number,
/// which only registrars and admins may assign. The uniqueness check reads
/// all other vehicles before writing; two concurrent assignments of the
/// same number can slip past each other (accepted TOCTOU window, the
/// schema carries no unique index).
#[utoipa::path(
    put,
    path = "/api/vehicles/{id}",
    params(
        ("id" = Uuid, Path, description = "Vehicle ID")
    ),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated", body = Vehicle),
        (status = 404, description = "Vehicle not found", body = ErrorResponse),
        (status = 409, description = "Voter number already assigned", body = ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateVehicleRequest>,
) -> Result<Json<Vehicle>, ApiError> {
    let entry = load_vehicle(&state, id).await?;
    owner_or_registration(&current, &entry)?;

    if let Some(ref voter_number) = req.voter_number {
        if !REGISTRATION.contains(current.claims.role) {
            return Err(ApiError::Forbidden);
        }
        if voter_number.trim().is_empty() {
            return Err(ApiError::Validation(
                "Voter number must not be empty".to_string(),
            ));
        }

        // Check-then-act against every other vehicle
        let clash = vehicle::Entity::find()
            .filter(vehicle::Column::VoterNumber.eq(voter_number.clone()))
            .filter(vehicle::Column::Id.ne(entry.id))
            .one(&state.db)
            .await?;
        if clash.is_some() {
            return Err(ApiError::Conflict {
                field: "voter number",
                value: voter_number.clone(),
            });
        }
    }

    if let Some(class_id) = req.class_id {
        vehicle_class::Entity::find_by_id(class_id)
            .one(&state.db)
            .await?
            .ok_or(ApiError::NotFound("Vehicle class"))?;
    }

    let mut active = entry.into_active_model();
    if let Some(make) = req.make {
        active.make = Set(make);
    }
    if let Some(model) = req.model {
        active.model = Set(model);
    }
    if let Some(year) = req.year {
        if !(1880..=2100).contains(&year) {
            return Err(ApiError::Validation(format!(
                "'{}' is not a plausible model year",
                year
            )));
        }
        active.year = Set(year);
    }
    if let Some(description) = req.description {
        active.description = Set(Some(description));
    }
    if let Some(class_id) = req.class_id {
        active.class_id = Set(Some(class_id));
    }
    if let Some(voter_number) = req.voter_number {
        active.voter_number = Set(Some(voter_number));
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}

/// Remove a vehicle
#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    params(
        ("id" = Uuid, Path, description = "Vehicle ID")
    ),
    responses(
        (status = 204, description = "Vehicle removed"),
        (status = 404, description = "Vehicle not found", body = ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let entry = load_vehicle(&state, id).await?;
    owner_or_registration(&current, &entry)?;

    let photo = entry.photo_url.clone();
    entry.delete(&state.db).await?;

    if let Some(photo) = photo {
        state.media.remove(&photo).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Upload or replace the vehicle photo
///
/// Same ordering contract as avatar replacement: write new, commit the
/// database reference, then best-effort delete the old file.
#[utoipa::path(
    post,
    path = "/api/vehicles/{id}/photo",
    params(
        ("id" = Uuid, Path, description = "Vehicle ID")
    ),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo replaced", body = UploadResponse),
        (status = 400, description = "Missing or unsupported file", body = ErrorResponse),
        (status = 404, description = "Vehicle not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Image could not be processed", body = ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let entry = load_vehicle(&state, id).await?;
    owner_or_registration(&current, &entry)?;

    let (data, content_type) = read_upload(multipart).await?;
    let previous = entry.photo_url.clone();

    // Write new
    let url = state
        .media
        .save(AssetClass::Vehicle, data, &content_type)
        .await?;

    // Commit reference
    let mut active = entry.into_active_model();
    active.photo_url = Set(Some(url.clone()));
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;

    // Delete old, best effort
    if let Some(previous) = previous {
        state.media.remove(&previous).await;
    }

    Ok(Json(UploadResponse { url }))
}
