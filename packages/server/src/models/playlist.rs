use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

use super::shared::{UserProfile, non_blank, require_text, validate_title};
use super::video::VideoSummary;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePlaylistRequest {
    #[schema(example = "Road trip")]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq, ToSchema)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Validated input for a new playlist.
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
}

impl CreatePlaylistRequest {
    pub fn validate(self) -> Result<NewPlaylist, AppError> {
        let name = require_text(self.name.as_deref(), "Playlist name")?;
        validate_title(&name, "Playlist name")?;
        Ok(NewPlaylist {
            name,
            description: self
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
        })
    }
}

impl UpdatePlaylistRequest {
    /// Drop blank fields; the rest are applied.
    pub fn normalize(self) -> Result<Self, AppError> {
        let name = non_blank(self.name);
        if let Some(ref name) = name {
            validate_title(name, "Playlist name")?;
        }
        Ok(Self {
            name,
            description: non_blank(self.description),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: Option<UserProfile>,
    pub video_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistListResponse {
    pub data: Vec<PlaylistSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: Option<UserProfile>,
    /// In playlist order.
    pub videos: Vec<VideoSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
