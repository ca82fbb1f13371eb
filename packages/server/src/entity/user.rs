use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Read-only projection of an identity-provider account. A user is a
/// "channel" when seen as the owner of videos and target of subscriptions.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,
    /// Avatar URL, empty when the user has none.
    pub avatar: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
