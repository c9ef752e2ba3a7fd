use chrono::{DateTime, Utc};
use concours_auth::Role;
use concours_db::entities::{product, score, specialty_vote, user, vehicle, vehicle_class};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Error body for inline failures
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Stable machine-readable code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Public view of an account; the password hash never leaves the server
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Account role
    #[schema(value_type = String, example = "user")]
    pub role: Role,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            display_name: model.display_name,
            email: model.email,
            phone: model.phone,
            role: model.role.into(),
            is_active: model.is_active,
            avatar_url: model.avatar_url,
            created_at: model.created_at,
        }
    }
}

/// Self-registration request
///
/// Deliberately carries no role field; unknown fields in the body are
/// ignored, and the created account is always a regular user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Response when registering
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user: User,
    /// Session token (also set as an HttpOnly cookie)
    pub token: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response when logging in
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: User,
    /// Session token (also set as an HttpOnly cookie)
    pub token: String,
}

/// Self-service profile update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Self-service password change
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Admin account creation; unlike self-registration, any role is allowed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[schema(value_type = String, example = "judge")]
    pub role: Role,
}

/// Admin account update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "registrar")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// List of accounts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserList {
    pub users: Vec<User>,
    pub total: usize,
}

/// Registered show vehicle
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<Uuid>,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Windshield-card voter number, once assigned by a registrar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<vehicle::Model> for Vehicle {
    fn from(model: vehicle::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            class_id: model.class_id,
            make: model.make,
            model: model.model,
            year: model.year,
            description: model.description,
            voter_number: model.voter_number,
            photo_url: model.photo_url,
            created_at: model.created_at,
        }
    }
}

/// Vehicle registration request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateVehicleRequest {
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<Uuid>,
}

/// Vehicle update request
///
/// Assigning `voter_number` is a registrar/admin capability; other fields
/// are open to the owner as well.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateVehicleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_number: Option<String>,
}

/// List of vehicles
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VehicleList {
    pub vehicles: Vec<Vehicle>,
    pub total: usize,
}

/// Judging score
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Score {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub judge_id: Uuid,
    pub category: String,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

impl From<score::Model> for Score {
    fn from(model: score::Model) -> Self {
        Self {
            id: model.id,
            vehicle_id: model.vehicle_id,
            judge_id: model.judge_id,
            category: model.category,
            points: model.points,
            created_at: model.created_at,
        }
    }
}

/// Score submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateScoreRequest {
    pub vehicle_id: Uuid,
    pub category: String,
    pub points: i32,
}

/// List of scores
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreList {
    pub scores: Vec<Score>,
    pub total: usize,
}

/// Vendor product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price in cents
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<product::Model> for Product {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            vendor_id: model.vendor_id,
            name: model.name,
            description: model.description,
            price_cents: model.price_cents,
            created_at: model.created_at,
        }
    }
}

/// Product listing request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price_cents: i64,
}

/// Product update request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<i64>,
}

/// List of products
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub total: usize,
}

/// Specialty award vote
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Vote {
    pub id: Uuid,
    pub voter_id: Uuid,
    pub vehicle_id: Uuid,
    pub award: String,
    pub created_at: DateTime<Utc>,
}

impl From<specialty_vote::Model> for Vote {
    fn from(model: specialty_vote::Model) -> Self {
        Self {
            id: model.id,
            voter_id: model.voter_id,
            vehicle_id: model.vehicle_id,
            award: model.award,
            created_at: model.created_at,
        }
    }
}

/// Vote submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateVoteRequest {
    pub vehicle_id: Uuid,
    pub award: String,
}

/// List of votes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VoteList {
    pub votes: Vec<Vote>,
    pub total: usize,
}

/// Judging class
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VehicleClass {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<vehicle_class::Model> for VehicleClass {
    fn from(model: vehicle_class::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

/// Class creation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateClassRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// List of judging classes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassList {
    pub classes: Vec<VehicleClass>,
    pub total: usize,
}

/// Site-wide settings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_url: Option<String>,
}

/// Result of a media upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Logical URL of the stored asset
    pub url: String,
}
