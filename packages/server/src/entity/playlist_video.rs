use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One slot of a playlist's ordered video sequence. The composite key makes a
/// video appear at most once per playlist.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "playlist_video")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub playlist_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub video_id: String,

    #[sea_orm(default_value = 0)]
    pub position: i32,

    pub added_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
