//! Specialty voting endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use concours_db::entities::{specialty_vote, vehicle};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::{CreateVoteRequest, ErrorResponse, Vote, VoteList};
use crate::AppState;

/// Cast a specialty vote
///
/// One vote per award per account, enforced the same check-then-act way as
/// the voter-number validation.
#[utoipa::path(
    post,
    path = "/api/votes",
    request_body = CreateVoteRequest,
    responses(
        (status = 201, description = "Vote recorded", body = Vote),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 404, description = "Vehicle not found", body = ErrorResponse),
        (status = 409, description = "Already voted in this award", body = ErrorResponse)
    ),
    tag = "votes"
)]
pub async fn cast_vote(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateVoteRequest>,
) -> Result<(StatusCode, Json<Vote>), ApiError> {
    if req.award.trim().is_empty() {
        return Err(ApiError::Validation("Award must not be empty".to_string()));
    }

    vehicle::Entity::find_by_id(req.vehicle_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Vehicle"))?;

    let existing = specialty_vote::Entity::find()
        .filter(specialty_vote::Column::VoterId.eq(current.id))
        .filter(specialty_vote::Column::Award.eq(req.award.clone()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict {
            field: "vote",
            value: req.award,
        });
    }

    let entry = specialty_vote::ActiveModel {
        id: Set(Uuid::new_v4()),
        voter_id: Set(current.id),
        vehicle_id: Set(req.vehicle_id),
        award: Set(req.award),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// List all votes (admin)
#[utoipa::path(
    get,
    path = "/api/votes",
    responses(
        (status = 200, description = "All votes", body = VoteList)
    ),
    tag = "votes"
)]
pub async fn list_votes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VoteList>, ApiError> {
    let entries = specialty_vote::Entity::find()
        .order_by_desc(specialty_vote::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let total = entries.len();
    let votes = entries.into_iter().map(Vote::from).collect();

    Ok(Json(VoteList { votes, total }))
}
