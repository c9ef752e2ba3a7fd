//! Judging class endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use concours_db::entities::vehicle_class;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{ClassList, CreateClassRequest, ErrorResponse, VehicleClass};
use crate::AppState;

/// List judging classes
#[utoipa::path(
    get,
    path = "/api/classes",
    responses(
        (status = 200, description = "All judging classes", body = ClassList)
    ),
    tag = "classes"
)]
pub async fn list_classes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClassList>, ApiError> {
    let entries = vehicle_class::Entity::find()
        .order_by_asc(vehicle_class::Column::Name)
        .all(&state.db)
        .await?;

    let total = entries.len();
    let classes = entries.into_iter().map(VehicleClass::from).collect();

    Ok(Json(ClassList { classes, total }))
}

/// Create a judging class (admin)
#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassRequest,
    responses(
        (status = 201, description = "Class created", body = VehicleClass),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 409, description = "Class name taken", body = ErrorResponse)
    ),
    tag = "classes"
)]
pub async fn create_class(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateClassRequest>,
) -> Result<(StatusCode, Json<VehicleClass>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Class name must not be empty".to_string()));
    }

    let existing = vehicle_class::Entity::find()
        .filter(vehicle_class::Column::Name.eq(&req.name))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict {
            field: "class name",
            value: req.name,
        });
    }

    let entry = vehicle_class::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(req.name),
        description: Set(req.description),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// Remove a judging class (admin)
///
/// Vehicles in the class fall back to unclassified; they are not deleted.
#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 204, description = "Class removed"),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "classes"
)]
pub async fn delete_class(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let entry = vehicle_class::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Vehicle class"))?;

    entry.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
