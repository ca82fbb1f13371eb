use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Media store URL of the video file.
    pub video_file: String,
    /// Media store URL of the thumbnail image.
    pub thumbnail: String,

    pub owner_id: String,
    pub is_published: bool,
    #[sea_orm(default_value = 0)]
    pub views: i64,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
