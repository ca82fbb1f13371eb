use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::object_id::ObjectId;

/// What a like points at. Stored as an explicit discriminant next to the
/// target id so a row always has exactly one target.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum LikeKind {
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "comment")]
    Comment,
    #[sea_orm(string_value = "tweet")]
    Tweet,
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "likes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub target_kind: LikeKind,
    pub target_id: String,
    pub liked_by: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

/// Typed view of a like's target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LikeTarget {
    Video(ObjectId),
    Comment(ObjectId),
    Tweet(ObjectId),
}

impl LikeTarget {
    pub fn kind(&self) -> LikeKind {
        match self {
            LikeTarget::Video(_) => LikeKind::Video,
            LikeTarget::Comment(_) => LikeKind::Comment,
            LikeTarget::Tweet(_) => LikeKind::Tweet,
        }
    }

    pub fn id(&self) -> ObjectId {
        match *self {
            LikeTarget::Video(id) | LikeTarget::Comment(id) | LikeTarget::Tweet(id) => id,
        }
    }

    /// Rebuild the target from a stored row. `None` if the stored id is not a
    /// well-formed object id.
    pub fn from_row(model: &Model) -> Option<Self> {
        let id = ObjectId::parse(&model.target_id)?;
        Some(match model.target_kind {
            LikeKind::Video => LikeTarget::Video(id),
            LikeKind::Comment => LikeTarget::Comment(id),
            LikeKind::Tweet => LikeTarget::Tweet(id),
        })
    }
}
