use std::collections::{HashMap, HashSet};

use sea_orm::*;

use crate::entity::like::{self, LikeKind};
use crate::entity::{comment, user, video};
use crate::error::AppError;
use crate::models::shared::UserProfile;
use crate::models::video::VideoSummary;
use crate::utils::object_id::ObjectId;

/// Like counts per target id for targets of `kind`.
pub async fn like_counts<C: ConnectionTrait>(
    db: &C,
    kind: LikeKind,
    target_ids: &[String],
) -> Result<HashMap<String, u64>, DbErr> {
    if target_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(String, i64)> = like::Entity::find()
        .select_only()
        .column(like::Column::TargetId)
        .column_as(like::Column::Id.count(), "like_count")
        .filter(like::Column::TargetKind.eq(kind))
        .filter(like::Column::TargetId.is_in(target_ids.iter().cloned()))
        .group_by(like::Column::TargetId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(into_counts(rows))
}

/// Comment counts per video id.
pub async fn comment_counts<C: ConnectionTrait>(
    db: &C,
    video_ids: &[String],
) -> Result<HashMap<String, u64>, DbErr> {
    if video_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(String, i64)> = comment::Entity::find()
        .select_only()
        .column(comment::Column::VideoId)
        .column_as(comment::Column::Id.count(), "comment_count")
        .filter(comment::Column::VideoId.is_in(video_ids.iter().cloned()))
        .group_by(comment::Column::VideoId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(into_counts(rows))
}

/// Public profiles keyed by user id. Unknown ids are simply absent.
pub async fn user_profiles<C: ConnectionTrait>(
    db: &C,
    user_ids: impl IntoIterator<Item = String>,
) -> Result<HashMap<String, UserProfile>, DbErr> {
    let ids: HashSet<String> = user_ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(users
        .into_iter()
        .map(|u| (u.id.clone(), UserProfile::from(u)))
        .collect())
}

/// The subset of `video_ids` that `viewer` has liked.
async fn liked_by_viewer<C: ConnectionTrait>(
    db: &C,
    viewer: ObjectId,
    video_ids: &[String],
) -> Result<HashSet<String>, DbErr> {
    if video_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let ids: Vec<String> = like::Entity::find()
        .select_only()
        .column(like::Column::TargetId)
        .filter(like::Column::TargetKind.eq(LikeKind::Video))
        .filter(like::Column::LikedBy.eq(viewer.to_hex()))
        .filter(like::Column::TargetId.is_in(video_ids.iter().cloned()))
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids.into_iter().collect())
}

/// Attach owner profile, like/comment counts and the viewer's like flag to a
/// page of videos. Order is preserved. Runs a fixed number of batched queries
/// regardless of page size.
pub async fn summarize_videos<C: ConnectionTrait>(
    db: &C,
    videos: Vec<video::Model>,
    viewer: Option<ObjectId>,
) -> Result<Vec<VideoSummary>, AppError> {
    let ids: Vec<String> = videos.iter().map(|v| v.id.clone()).collect();

    let owners = user_profiles(db, videos.iter().map(|v| v.owner_id.clone())).await?;
    let likes = like_counts(db, LikeKind::Video, &ids).await?;
    let comments = comment_counts(db, &ids).await?;
    let liked = match viewer {
        Some(viewer) => liked_by_viewer(db, viewer, &ids).await?,
        None => HashSet::new(),
    };

    Ok(videos
        .into_iter()
        .map(|v| VideoSummary {
            owner: owners.get(&v.owner_id).cloned(),
            like_count: likes.get(&v.id).copied().unwrap_or(0),
            is_liked: liked.contains(&v.id),
            comment_count: comments.get(&v.id).copied().unwrap_or(0),
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
        .collect())
}

fn into_counts(rows: Vec<(String, i64)>) -> HashMap<String, u64> {
    rows.into_iter()
        .map(|(id, n)| (id, u64::try_from(n).unwrap_or(0)))
        .collect()
}
