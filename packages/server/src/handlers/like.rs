use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::like::{self, LikeKind, LikeTarget};
use crate::entity::{comment, video};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::like::{LikeToggleResponse, LikedVideoListResponse};
use crate::state::AppState;
use crate::utils::enrich::summarize_videos;
use crate::utils::object_id::parse_id;
use crate::utils::toggle::toggle_like;

use super::video::find_video;

#[utoipa::path(
    post,
    path = "/toggle/v/{video_id}",
    tag = "Likes",
    operation_id = "toggleVideoLike",
    summary = "Like or unlike a video",
    description = "Removes the caller's like on the video if present, otherwise adds one.",
    params(("video_id" = String, Path, description = "Video ID (24 hex characters)")),
    responses(
        (status = 200, description = "New like state", body = LikeToggleResponse),
        (status = 400, description = "Invalid video id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Concurrent toggle (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(video_id = %video_id, user_id = %auth_user.user_id))]
pub async fn toggle_video_like(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<LikeToggleResponse>, AppError> {
    let id = parse_id(&video_id, "video")?;
    find_video(&state.db, id).await?;

    let toggled = toggle_like(&state.db, LikeTarget::Video(id), auth_user.user_id).await?;
    Ok(Json(LikeToggleResponse {
        liked: toggled.is_active(),
    }))
}

#[utoipa::path(
    post,
    path = "/toggle/c/{comment_id}",
    tag = "Likes",
    operation_id = "toggleCommentLike",
    summary = "Like or unlike a comment",
    description = "Removes the caller's like on the comment if present, otherwise adds one.",
    params(("comment_id" = String, Path, description = "Comment ID (24 hex characters)")),
    responses(
        (status = 200, description = "New like state", body = LikeToggleResponse),
        (status = 400, description = "Invalid comment id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Concurrent toggle (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(comment_id = %comment_id, user_id = %auth_user.user_id))]
pub async fn toggle_comment_like(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<Json<LikeToggleResponse>, AppError> {
    let id = parse_id(&comment_id, "comment")?;
    comment::Entity::find_by_id(id.to_hex())
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;

    let toggled = toggle_like(&state.db, LikeTarget::Comment(id), auth_user.user_id).await?;
    Ok(Json(LikeToggleResponse {
        liked: toggled.is_active(),
    }))
}

#[utoipa::path(
    post,
    path = "/toggle/t/{tweet_id}",
    tag = "Likes",
    operation_id = "toggleTweetLike",
    summary = "Like or unlike a tweet",
    description = "Removes the caller's like on the tweet if present, otherwise adds one. Tweets live outside this \
        service, so the target is not checked for existence.",
    params(("tweet_id" = String, Path, description = "Tweet ID (24 hex characters)")),
    responses(
        (status = 200, description = "New like state", body = LikeToggleResponse),
        (status = 400, description = "Invalid tweet id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Concurrent toggle (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(tweet_id = %tweet_id, user_id = %auth_user.user_id))]
pub async fn toggle_tweet_like(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> Result<Json<LikeToggleResponse>, AppError> {
    let id = parse_id(&tweet_id, "tweet")?;

    let toggled = toggle_like(&state.db, LikeTarget::Tweet(id), auth_user.user_id).await?;
    Ok(Json(LikeToggleResponse {
        liked: toggled.is_active(),
    }))
}

#[utoipa::path(
    get,
    path = "/videos",
    tag = "Likes",
    operation_id = "listLikedVideos",
    summary = "List videos the caller liked",
    description = "Most recently liked first. Likes on videos that no longer exist, or that their owner has \
        unpublished, are skipped.",
    responses(
        (status = 200, description = "Liked videos", body = LikedVideoListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_liked_videos(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<LikedVideoListResponse>, AppError> {
    let likes = like::Entity::find()
        .filter(like::Column::TargetKind.eq(LikeKind::Video))
        .filter(like::Column::LikedBy.eq(auth_user.user_id.to_hex()))
        .order_by_desc(like::Column::CreatedAt)
        .order_by_desc(like::Column::Id)
        .all(&state.db)
        .await?;

    let video_ids: Vec<String> = likes
        .iter()
        .filter_map(LikeTarget::from_row)
        .map(|target| target.id().to_hex())
        .collect();
    if video_ids.is_empty() {
        return Ok(Json(LikedVideoListResponse { data: Vec::new() }));
    }

    let mut by_id: HashMap<String, video::Model> = video::Entity::find()
        .filter(video::Column::Id.is_in(video_ids.clone()))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|v| (v.id.clone(), v))
        .collect();

    let owner = auth_user.user_id.to_hex();
    let ordered: Vec<video::Model> = video_ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .filter(|v| v.is_published || v.owner_id == owner)
        .collect();

    let data = summarize_videos(&state.db, ordered, Some(auth_user.user_id)).await?;
    Ok(Json(LikedVideoListResponse { data }))
}
