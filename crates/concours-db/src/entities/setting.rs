//! Site-wide settings entity (key/value)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key of the site background image asset URL
pub const BACKGROUND_URL: &str = "background_url";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    /// Setting key (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,

    pub value: String,

    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
