use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Rollup over one channel's videos, all publish states included.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChannelStats {
    pub total_videos: u64,
    pub total_views: i64,
    pub total_subscribers: u64,
    pub total_likes: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChannelVideo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub is_published: bool,
    pub views: i64,
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChannelVideoListResponse {
    pub data: Vec<ChannelVideo>,
}
