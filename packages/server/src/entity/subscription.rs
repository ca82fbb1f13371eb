use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `subscriber_id` follows `channel_id`. Unique per pair (see
/// `database::ensure_indexes`); the two ids never match.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub subscriber_id: String,
    pub channel_id: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
