use axum::Json;
use axum::extract::State;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::instrument;

use crate::entity::like::{self, LikeKind};
use crate::entity::{subscription, video};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::dashboard::*;
use crate::state::AppState;
use crate::utils::enrich::like_counts;

#[utoipa::path(
    get,
    path = "/stats",
    tag = "Dashboard",
    operation_id = "getChannelStats",
    summary = "Statistics for the caller's channel",
    description = "Totals over all of the caller's videos, published or not: video count, summed views, \
        subscriber count and likes received on those videos.",
    responses(
        (status = 200, description = "Channel statistics", body = ChannelStats),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(channel_id = %auth_user.user_id))]
pub async fn channel_stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ChannelStats>, AppError> {
    let channel = auth_user.user_id.to_hex();

    // Views are summed here rather than in SQL so the result type does not
    // depend on the backend's SUM widening.
    let views: Vec<i64> = video::Entity::find()
        .select_only()
        .column(video::Column::Views)
        .filter(video::Column::OwnerId.eq(channel.as_str()))
        .into_tuple()
        .all(&state.db)
        .await?;

    let total_views: i64 = views.iter().sum();

    let total_subscribers = subscription::Entity::find()
        .filter(subscription::Column::ChannelId.eq(channel.as_str()))
        .count(&state.db)
        .await?;

    let total_likes = like::Entity::find()
        .filter(like::Column::TargetKind.eq(LikeKind::Video))
        .filter(
            like::Column::TargetId.in_subquery(
                SeaQuery::select()
                    .column(video::Column::Id)
                    .from(video::Entity)
                    .and_where(video::Column::OwnerId.eq(channel.as_str()))
                    .to_owned(),
            ),
        )
        .count(&state.db)
        .await?;

    Ok(Json(ChannelStats {
        total_videos: views.len() as u64,
        total_views,
        total_subscribers,
        total_likes,
    }))
}

#[utoipa::path(
    get,
    path = "/videos",
    tag = "Dashboard",
    operation_id = "getChannelVideos",
    summary = "All videos of the caller's channel",
    description = "Every video the caller owns, published or not, newest first, with like counts.",
    responses(
        (status = 200, description = "Channel videos", body = ChannelVideoListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(channel_id = %auth_user.user_id))]
pub async fn channel_videos(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ChannelVideoListResponse>, AppError> {
    let videos = video::Entity::find()
        .filter(video::Column::OwnerId.eq(auth_user.user_id.to_hex()))
        .order_by_desc(video::Column::CreatedAt)
        .order_by_desc(video::Column::Id)
        .all(&state.db)
        .await?;

    let ids: Vec<String> = videos.iter().map(|v| v.id.clone()).collect();
    let likes = like_counts(&state.db, LikeKind::Video, &ids).await?;

    let data = videos
        .into_iter()
        .map(|v| ChannelVideo {
            like_count: likes.get(&v.id).copied().unwrap_or(0),
            id: v.id,
            title: v.title,
            description: v.description,
            video_file: v.video_file,
            thumbnail: v.thumbnail,
            is_published: v.is_published,
            views: v.views,
            created_at: v.created_at,
            updated_at: v.updated_at,
        })
        .collect();

    Ok(Json(ChannelVideoListResponse { data }))
}
