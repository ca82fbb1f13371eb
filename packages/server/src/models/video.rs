use chrono::{DateTime, Utc};
use sea_orm::Order;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::video;

pub use super::shared::{Pagination, UserProfile};

/// Query string of `GET /videos`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct VideoListQuery {
    /// Page number, 1-based. Defaults to 1.
    pub page: Option<u64>,
    /// Page size, 1-100. Defaults to 10.
    pub limit: Option<u64>,
    /// Case-insensitive substring matched against title and description.
    pub query: Option<String>,
    /// `createdAt` (default), `updatedAt`, `title` or `views`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_type: Option<String>,
    /// Only videos owned by this user.
    pub user_id: Option<String>,
}

/// Primary sort key for a `sortBy` value. `None` means the key names no
/// column; every row then compares equal and only the id tie-break applies.
pub fn sort_column(sort_by: Option<&str>) -> Option<video::Column> {
    match sort_by.map(str::trim) {
        None | Some("") | Some("createdAt") | Some("created_at") => Some(video::Column::CreatedAt),
        Some("updatedAt") | Some("updated_at") => Some(video::Column::UpdatedAt),
        Some("title") => Some(video::Column::Title),
        Some("views") => Some(video::Column::Views),
        Some(_) => None,
    }
}

pub fn sort_order(sort_type: Option<&str>) -> Order {
    if sort_type.map(str::trim) == Some("asc") {
        Order::Asc
    } else {
        Order::Desc
    }
}

/// A stored video as returned by mutations.
#[derive(Debug, Serialize, ToSchema)]
pub struct VideoResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub owner_id: String,
    pub is_published: bool,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<video::Model> for VideoResponse {
    fn from(m: video::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            video_file: m.video_file,
            thumbnail: m.thumbnail,
            owner_id: m.owner_id,
            is_published: m.is_published,
            views: m.views,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// A video enriched for a particular viewer.
#[derive(Debug, Serialize, ToSchema)]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub is_published: bool,
    pub views: i64,
    /// Absent when the owner account no longer exists.
    pub owner: Option<UserProfile>,
    pub like_count: u64,
    /// Always `false` for anonymous viewers.
    pub is_liked: bool,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoListResponse {
    pub data: Vec<VideoSummary>,
    pub pagination: Pagination,
}
