use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{playlist, playlist_video, video};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::playlist::*;
use crate::state::AppState;
use crate::utils::enrich::{summarize_videos, user_profiles};
use crate::utils::object_id::{ObjectId, parse_id};
use crate::utils::ownership::require_owner;

use super::video::find_video;

#[utoipa::path(
    post,
    path = "/",
    tag = "Playlists",
    operation_id = "createPlaylist",
    summary = "Create a playlist",
    description = "Creates an empty playlist owned by the caller. `name` is required.",
    request_body = CreatePlaylistRequest,
    responses(
        (status = 201, description = "Playlist created", body = PlaylistDetail),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(owner_id = %auth_user.user_id))]
pub async fn create_playlist(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePlaylistRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = payload.validate()?;

    let now = chrono::Utc::now();
    let model = playlist::ActiveModel {
        id: Set(ObjectId::new().to_hex()),
        name: Set(new.name),
        description: Set(new.description),
        owner_id: Set(auth_user.user_id.to_hex()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    let detail = playlist_detail(&state.db, model, Some(auth_user.user_id)).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    get,
    path = "/user/{user_id}",
    tag = "Playlists",
    operation_id = "listUserPlaylists",
    summary = "List a user's playlists",
    description = "Newest first, each with the owner's public profile and its number of videos.",
    params(("user_id" = String, Path, description = "Owner (user) ID (24 hex characters)")),
    responses(
        (status = 200, description = "Playlists", body = PlaylistListResponse),
        (status = 400, description = "Invalid user id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _viewer), fields(user_id = %user_id))]
pub async fn list_user_playlists(
    _viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PlaylistListResponse>, AppError> {
    let owner = parse_id(&user_id, "user")?;

    let playlists = playlist::Entity::find()
        .filter(playlist::Column::OwnerId.eq(owner.to_hex()))
        .order_by_desc(playlist::Column::CreatedAt)
        .order_by_desc(playlist::Column::Id)
        .all(&state.db)
        .await?;

    let ids: Vec<String> = playlists.iter().map(|p| p.id.clone()).collect();
    let counts = video_counts(&state.db, &ids).await?;
    let profiles = user_profiles(&state.db, [owner.to_hex()]).await?;

    let data = playlists
        .into_iter()
        .map(|p| PlaylistSummary {
            owner: profiles.get(&p.owner_id).cloned(),
            video_count: counts.get(&p.id).copied().unwrap_or(0),
            id: p.id,
            name: p.name,
            description: p.description,
            created_at: p.created_at,
            updated_at: p.updated_at,
        })
        .collect();

    Ok(Json(PlaylistListResponse { data }))
}

#[utoipa::path(
    get,
    path = "/{playlist_id}",
    tag = "Playlists",
    operation_id = "getPlaylist",
    summary = "Get a playlist by ID",
    description = "Returns the playlist with its owner's public profile and its videos in playlist order. \
        Deleted videos are skipped, as are unpublished videos not owned by the caller. Authentication is optional.",
    params(("playlist_id" = String, Path, description = "Playlist ID (24 hex characters)")),
    responses(
        (status = 200, description = "Playlist details", body = PlaylistDetail),
        (status = 400, description = "Invalid playlist id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Playlist not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, viewer), fields(playlist_id = %playlist_id))]
pub async fn get_playlist(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> Result<Json<PlaylistDetail>, AppError> {
    let id = parse_id(&playlist_id, "playlist")?;
    let model = find_playlist(&state.db, id).await?;

    Ok(Json(
        playlist_detail(&state.db, model, viewer.map(|v| v.user_id)).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/{playlist_id}",
    tag = "Playlists",
    operation_id = "updatePlaylist",
    summary = "Update a playlist",
    description = "Owner only. Only fields that are present and non-blank are applied.",
    params(("playlist_id" = String, Path, description = "Playlist ID (24 hex characters)")),
    request_body = UpdatePlaylistRequest,
    responses(
        (status = 200, description = "Playlist updated", body = PlaylistDetail),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Playlist not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(playlist_id = %playlist_id))]
pub async fn update_playlist(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    AppJson(payload): AppJson<UpdatePlaylistRequest>,
) -> Result<Json<PlaylistDetail>, AppError> {
    let id = parse_id(&playlist_id, "playlist")?;
    let payload = payload.normalize()?;

    let existing = find_playlist(&state.db, id).await?;
    require_owner(&existing, auth_user.user_id, "update")?;

    if payload == UpdatePlaylistRequest::default() {
        let detail = playlist_detail(&state.db, existing, Some(auth_user.user_id)).await?;
        return Ok(Json(detail));
    }

    let mut active: playlist::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    Ok(Json(
        playlist_detail(&state.db, model, Some(auth_user.user_id)).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/{playlist_id}",
    tag = "Playlists",
    operation_id = "deletePlaylist",
    summary = "Delete a playlist",
    description = "Owner only. The playlist's membership rows go with it; the videos themselves are untouched.",
    params(("playlist_id" = String, Path, description = "Playlist ID (24 hex characters)")),
    responses(
        (status = 204, description = "Playlist deleted"),
        (status = 400, description = "Invalid playlist id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Playlist not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(playlist_id = %playlist_id))]
pub async fn delete_playlist(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&playlist_id, "playlist")?;

    let txn = state.db.begin().await?;

    let existing = find_playlist(&txn, id).await?;
    require_owner(&existing, auth_user.user_id, "delete")?;

    playlist_video::Entity::delete_many()
        .filter(playlist_video::Column::PlaylistId.eq(existing.id.as_str()))
        .exec(&txn)
        .await?;
    playlist::Entity::delete_by_id(existing.id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/add/{video_id}/{playlist_id}",
    tag = "Playlists",
    operation_id = "addVideoToPlaylist",
    summary = "Append a video to a playlist",
    description = "Owner only. The video is appended at the end. A video can appear in a playlist only once.",
    params(
        ("video_id" = String, Path, description = "Video ID (24 hex characters)"),
        ("playlist_id" = String, Path, description = "Playlist ID (24 hex characters)"),
    ),
    responses(
        (status = 200, description = "Updated playlist", body = PlaylistDetail),
        (status = 400, description = "Invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Playlist or video not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Video already in playlist (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(video_id = %video_id, playlist_id = %playlist_id))]
pub async fn add_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> Result<Json<PlaylistDetail>, AppError> {
    let video = parse_id(&video_id, "video")?;
    let id = parse_id(&playlist_id, "playlist")?;

    let txn = state.db.begin().await?;

    let existing = find_playlist(&txn, id).await?;
    require_owner(&existing, auth_user.user_id, "modify")?;
    find_video(&txn, video).await?;

    let already = playlist_video::Entity::find_by_id((existing.id.clone(), video.to_hex()))
        .one(&txn)
        .await?;
    if already.is_some() {
        return Err(AppError::Conflict("Video already in playlist".into()));
    }

    let max_pos: Option<i32> = playlist_video::Entity::find()
        .select_only()
        .column_as(playlist_video::Column::Position.max(), "max_pos")
        .filter(playlist_video::Column::PlaylistId.eq(existing.id.as_str()))
        .into_tuple::<Option<i32>>()
        .one(&txn)
        .await?
        .flatten();

    let entry = playlist_video::ActiveModel {
        playlist_id: Set(existing.id.clone()),
        video_id: Set(video.to_hex()),
        position: Set(max_pos.map_or(0, |p| p + 1)),
        added_at: Set(chrono::Utc::now()),
    };
    match playlist_video::Entity::insert(entry)
        .exec_without_returning(&txn)
        .await
    {
        Ok(_) => {}
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::Conflict("Video already in playlist".into()));
        }
        Err(e) => return Err(e.into()),
    }

    let mut active: playlist::ActiveModel = existing.into();
    active.updated_at = Set(chrono::Utc::now());
    let model = active.update(&txn).await?;

    txn.commit().await?;

    Ok(Json(
        playlist_detail(&state.db, model, Some(auth_user.user_id)).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/remove/{video_id}/{playlist_id}",
    tag = "Playlists",
    operation_id = "removeVideoFromPlaylist",
    summary = "Remove a video from a playlist",
    description = "Owner only. Removing a video that is not in the playlist is a no-op.",
    params(
        ("video_id" = String, Path, description = "Video ID (24 hex characters)"),
        ("playlist_id" = String, Path, description = "Playlist ID (24 hex characters)"),
    ),
    responses(
        (status = 200, description = "Updated playlist", body = PlaylistDetail),
        (status = 400, description = "Invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Playlist not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(video_id = %video_id, playlist_id = %playlist_id))]
pub async fn remove_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> Result<Json<PlaylistDetail>, AppError> {
    let video = parse_id(&video_id, "video")?;
    let id = parse_id(&playlist_id, "playlist")?;

    let existing = find_playlist(&state.db, id).await?;
    require_owner(&existing, auth_user.user_id, "modify")?;

    let removed = playlist_video::Entity::delete_by_id((existing.id.clone(), video.to_hex()))
        .exec(&state.db)
        .await?;

    let model = if removed.rows_affected > 0 {
        let mut active: playlist::ActiveModel = existing.into();
        active.updated_at = Set(chrono::Utc::now());
        active.update(&state.db).await?
    } else {
        existing
    };

    Ok(Json(
        playlist_detail(&state.db, model, Some(auth_user.user_id)).await?,
    ))
}

async fn find_playlist<C: ConnectionTrait>(
    db: &C,
    id: ObjectId,
) -> Result<playlist::Model, AppError> {
    playlist::Entity::find_by_id(id.to_hex())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".into()))
}

/// Membership counts per playlist id.
async fn video_counts<C: ConnectionTrait>(
    db: &C,
    playlist_ids: &[String],
) -> Result<HashMap<String, u64>, DbErr> {
    if playlist_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(String, i64)> = playlist_video::Entity::find()
        .select_only()
        .column(playlist_video::Column::PlaylistId)
        .column_as(playlist_video::Column::VideoId.count(), "video_count")
        .filter(playlist_video::Column::PlaylistId.is_in(playlist_ids.iter().cloned()))
        .group_by(playlist_video::Column::PlaylistId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(id, n)| (id, u64::try_from(n).unwrap_or(0)))
        .collect())
}

async fn playlist_detail<C: ConnectionTrait>(
    db: &C,
    model: playlist::Model,
    viewer: Option<ObjectId>,
) -> Result<PlaylistDetail, AppError> {
    let entries = playlist_video::Entity::find()
        .filter(playlist_video::Column::PlaylistId.eq(model.id.as_str()))
        .order_by_asc(playlist_video::Column::Position)
        .order_by_asc(playlist_video::Column::AddedAt)
        .all(db)
        .await?;

    let video_ids: Vec<String> = entries.into_iter().map(|e| e.video_id).collect();
    let mut by_id: HashMap<String, video::Model> = if video_ids.is_empty() {
        HashMap::new()
    } else {
        video::Entity::find()
            .filter(video::Column::Id.is_in(video_ids.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|v| (v.id.clone(), v))
            .collect()
    };

    let viewer_hex = viewer.map(|v| v.to_hex());
    let visible: Vec<video::Model> = video_ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .filter(|v| v.is_published || viewer_hex.as_deref() == Some(v.owner_id.as_str()))
        .collect();

    let videos = summarize_videos(db, visible, viewer).await?;
    let owner = user_profiles(db, [model.owner_id.clone()])
        .await?
        .remove(&model.owner_id);

    Ok(PlaylistDetail {
        id: model.id,
        name: model.name,
        description: model.description,
        owner,
        videos,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
