//! Judging endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use concours_db::entities::{score, vehicle};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::{CreateScoreRequest, ErrorResponse, Score, ScoreList};
use crate::AppState;

/// Highest score a judge may award per category
const MAX_POINTS: i32 = 100;

#[derive(Debug, Deserialize)]
pub struct ScoreQuery {
    pub vehicle_id: Option<Uuid>,
}

/// Submit a score for a vehicle
#[utoipa::path(
    post,
    path = "/api/scores",
    request_body = CreateScoreRequest,
    responses(
        (status = 201, description = "Score recorded", body = Score),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 404, description = "Vehicle not found", body = ErrorResponse)
    ),
    tag = "judging"
)]
pub async fn create_score(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateScoreRequest>,
) -> Result<(StatusCode, Json<Score>), ApiError> {
    if req.category.trim().is_empty() {
        return Err(ApiError::Validation("Category must not be empty".to_string()));
    }
    if !(0..=MAX_POINTS).contains(&req.points) {
        return Err(ApiError::Validation(format!(
            "Points must be between 0 and {}",
            MAX_POINTS
        )));
    }

    vehicle::Entity::find_by_id(req.vehicle_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Vehicle"))?;

    let entry = score::ActiveModel {
        id: Set(Uuid::new_v4()),
        vehicle_id: Set(req.vehicle_id),
        judge_id: Set(current.id),
        category: Set(req.category),
        points: Set(req.points),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// List scores, optionally for a single vehicle
#[utoipa::path(
    get,
    path = "/api/scores",
    params(
        ("vehicle_id" = Option<Uuid>, Query, description = "Filter by vehicle")
    ),
    responses(
        (status = 200, description = "Scores", body = ScoreList)
    ),
    tag = "judging"
)]
pub async fn list_scores(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScoreQuery>,
) -> Result<Json<ScoreList>, ApiError> {
    let mut find = score::Entity::find().order_by_desc(score::Column::CreatedAt);
    if let Some(vehicle_id) = query.vehicle_id {
        find = find.filter(score::Column::VehicleId.eq(vehicle_id));
    }

    let entries = find.all(&state.db).await?;
    let total = entries.len();
    let scores = entries.into_iter().map(Score::from).collect();

    Ok(Json(ScoreList { scores, total }))
}
