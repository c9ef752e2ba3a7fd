//! Vehicle entity for show registration

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    /// Vehicle UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning user
    pub owner_id: Uuid,

    /// Judging class, once assigned
    pub class_id: Option<Uuid>,

    pub make: String,

    pub model: String,

    pub year: i32,

    pub description: Option<String>,

    /// Human-assigned voter identifier shown on the windshield card.
    ///
    /// Uniqueness across vehicles is enforced by a check-then-act read in
    /// the update handler, not by the schema; two concurrent assignments of
    /// the same number can both land (known TOCTOU window).
    pub voter_number: Option<String>,

    /// Current photo asset URL, if any
    pub photo_url: Option<String>,

    /// When the vehicle was registered
    pub created_at: ChronoDateTimeUtc,

    /// When the record was last updated
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Vehicle belongs to a user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Owner,

    /// Vehicle belongs to a judging class
    #[sea_orm(
        belongs_to = "super::vehicle_class::Entity",
        from = "Column::ClassId",
        to = "super::vehicle_class::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Class,

    /// Vehicle has judging scores
    #[sea_orm(has_many = "super::score::Entity")]
    Scores,

    /// Vehicle has received specialty votes
    #[sea_orm(has_many = "super::specialty_vote::Entity")]
    SpecialtyVotes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::vehicle_class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::score::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scores.def()
    }
}

impl Related<super::specialty_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpecialtyVotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
