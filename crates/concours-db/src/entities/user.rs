//! User entity for authentication and account management

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role stored on the user row
///
/// The set is closed at the type level: loading a row whose role column
/// holds anything else fails, and the account gets no capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum UserRole {
    /// System administrator with full access
    #[sea_orm(string_value = "admin")]
    Admin,

    /// Judge scoring registered vehicles
    #[sea_orm(string_value = "judge")]
    Judge,

    /// Registrar managing show entries and voter numbers
    #[sea_orm(string_value = "registrar")]
    Registrar,

    /// Vendor selling products at the show
    #[sea_orm(string_value = "vendor")]
    Vendor,

    /// Regular attendee
    #[sea_orm(string_value = "user")]
    User,
}

impl From<UserRole> for concours_auth::Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => concours_auth::Role::Admin,
            UserRole::Judge => concours_auth::Role::Judge,
            UserRole::Registrar => concours_auth::Role::Registrar,
            UserRole::Vendor => concours_auth::Role::Vendor,
            UserRole::User => concours_auth::Role::User,
        }
    }
}

impl From<concours_auth::Role> for UserRole {
    fn from(role: concours_auth::Role) -> Self {
        match role {
            concours_auth::Role::Admin => UserRole::Admin,
            concours_auth::Role::Judge => UserRole::Judge,
            concours_auth::Role::Registrar => UserRole::Registrar,
            concours_auth::Role::Vendor => UserRole::Vendor,
            concours_auth::Role::User => UserRole::User,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// User UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Login handle (unique)
    #[sea_orm(unique)]
    pub username: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Name shown on rosters and ballots
    pub display_name: String,

    /// Contact email
    pub email: String,

    /// Contact phone (optional)
    pub phone: Option<String>,

    /// Account role
    pub role: UserRole,

    /// Whether the account may authenticate
    pub is_active: bool,

    /// Current avatar asset URL, if any
    pub avatar_url: Option<String>,

    /// When the account was created
    pub created_at: ChronoDateTimeUtc,

    /// When the account was last updated
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// User owns registered vehicles
    #[sea_orm(has_many = "super::vehicle::Entity")]
    Vehicles,

    /// User (as judge) has submitted scores
    #[sea_orm(has_many = "super::score::Entity")]
    Scores,

    /// User (as vendor) lists products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,

    /// User has cast specialty votes
    #[sea_orm(has_many = "super::specialty_vote::Entity")]
    SpecialtyVotes,
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicles.def()
    }
}

impl Related<super::score::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scores.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::specialty_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpecialtyVotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
