use serde::Serialize;
use utoipa::ToSchema;

use super::video::VideoSummary;

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeToggleResponse {
    /// Whether the actor likes the target after the call.
    pub liked: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LikedVideoListResponse {
    /// Most recently liked first.
    pub data: Vec<VideoSummary>,
}
