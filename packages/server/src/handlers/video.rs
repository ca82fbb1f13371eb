use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, Query as SeaQuery};
use sea_orm::*;
use tracing::instrument;

use crate::entity::like::{self, LikeKind};
use crate::entity::{comment, playlist_video, video};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppQuery;
use crate::models::shared::{escape_like, non_blank, page_window, validate_title};
use crate::models::video::*;
use crate::state::AppState;
use crate::utils::enrich::summarize_videos;
use crate::utils::media::{SpooledFile, spool_field};
use crate::utils::object_id::{ObjectId, parse_id};
use crate::utils::ownership::require_owner;

/// Body limit for multipart video routes: a video and a thumbnail at the
/// configured maximum each, plus form overhead.
pub fn upload_body_limit(max_blob_size: u64) -> DefaultBodyLimit {
    let limit = max_blob_size.saturating_mul(2).saturating_add(1024 * 1024);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Videos",
    operation_id = "listVideos",
    summary = "List published videos",
    description = "Returns a page of published videos. `query` matches title or description case-insensitively. \
        `userId` restricts to one owner (ignored when malformed). Sorting defaults to `createdAt` descending; \
        ties are always broken by id in the same direction. Each item carries the owner's public profile, \
        like and comment counts, and whether the caller liked it. Authentication is optional.",
    params(VideoListQuery),
    responses(
        (status = 200, description = "Page of videos", body = VideoListResponse),
        (status = 400, description = "Malformed query string (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, viewer, query))]
pub async fn list_videos(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<VideoListQuery>,
) -> Result<Json<VideoListResponse>, AppError> {
    let (page, per_page) = page_window(query.page, query.limit);

    let mut select = video::Entity::find().filter(video::Column::IsPublished.eq(true));

    if let Some(ref search) = query.query {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            let pattern = format!("%{}%", term.to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(video::Column::Title)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(video::Column::Description)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }
    }

    if let Some(raw) = query.user_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        match ObjectId::parse(raw) {
            Some(owner) => select = select.filter(video::Column::OwnerId.eq(owner.to_hex())),
            None => tracing::debug!(user_id = raw, "Ignoring malformed userId filter"),
        }
    }

    let total = select.clone().count(&state.db).await?;
    let pagination = Pagination::new(page, per_page, total);
    if pagination.is_past_end() {
        return Ok(Json(VideoListResponse {
            data: Vec::new(),
            pagination,
        }));
    }

    let order = sort_order(query.sort_type.as_deref());
    if let Some(column) = sort_column(query.sort_by.as_deref()) {
        select = select.order_by(column, order.clone());
    }
    let videos = select
        .order_by(video::Column::Id, order)
        .offset(Some(pagination.offset()))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let data = summarize_videos(&state.db, videos, viewer.map(|v| v.user_id)).await?;

    Ok(Json(VideoListResponse { data, pagination }))
}

#[utoipa::path(
    get,
    path = "/{video_id}",
    tag = "Videos",
    operation_id = "getVideo",
    summary = "Get a video by ID",
    description = "Returns one video with the same enrichment as the list. Unpublished videos are only visible to their owner. \
        Authentication is optional.",
    params(("video_id" = String, Path, description = "Video ID (24 hex characters)")),
    responses(
        (status = 200, description = "Video details", body = VideoSummary),
        (status = 400, description = "Invalid video id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, viewer), fields(video_id = %video_id))]
pub async fn get_video(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoSummary>, AppError> {
    let id = parse_id(&video_id, "video")?;
    let viewer = viewer.map(|v| v.user_id);

    let model = find_video(&state.db, id).await?;
    if !model.is_published && viewer.map(|v| v.to_hex()).as_deref() != Some(&model.owner_id) {
        return Err(AppError::NotFound("Video not found".into()));
    }

    summarize_videos(&state.db, vec![model], viewer)
        .await?
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::Internal("video summary missing".into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Videos",
    operation_id = "publishVideo",
    summary = "Publish a new video",
    description = "Uploads the `video` and `thumbnail` files to the media store and creates a published video owned by \
        the caller. `title` and `description` are required. If either upload fails no video is created.",
    request_body(content_type = "multipart/form-data", description = "Fields: title, description, video (file), thumbnail (file)"),
    responses(
        (status = 201, description = "Video created", body = VideoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Media upload failed (UPLOAD_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(owner_id = %auth_user.user_id))]
pub async fn publish_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let max_size = state.config.storage.max_blob_size;

    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut video_file: Option<SpooledFile> = None;
    let mut thumbnail: Option<SpooledFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("title") => title = Some(read_text(field, "title").await?),
            Some("description") => description = Some(read_text(field, "description").await?),
            Some("video") => video_file = Some(spool_field(field, max_size, "video").await?),
            Some("thumbnail") => {
                thumbnail = Some(spool_field(field, max_size, "thumbnail").await?);
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let (Some(title), Some(description)) = (non_blank(title), non_blank(description)) else {
        return Err(AppError::Validation(
            "Title and description are required".into(),
        ));
    };
    validate_title(&title, "Title")?;
    let video_file =
        video_file.ok_or_else(|| AppError::Validation("Video file is required".into()))?;
    let thumbnail =
        thumbnail.ok_or_else(|| AppError::Validation("Thumbnail is required".into()))?;

    // Media only reaches the store once the whole request is valid.
    let video_file = video_file.commit(&*state.media, max_size, "video").await?;
    let thumbnail = thumbnail.commit(&*state.media, max_size, "thumbnail").await?;

    let public_url = &state.config.storage.public_url;
    let now = chrono::Utc::now();
    let new_video = video::ActiveModel {
        id: Set(ObjectId::new().to_hex()),
        title: Set(title),
        description: Set(description),
        video_file: Set(video_file.url(public_url)),
        thumbnail: Set(thumbnail.url(public_url)),
        owner_id: Set(auth_user.user_id.to_hex()),
        is_published: Set(true),
        views: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = new_video.insert(&state.db).await?;
    tracing::info!(video_id = %model.id, bytes = video_file.size, "Video published");

    Ok((StatusCode::CREATED, Json(VideoResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/{video_id}",
    tag = "Videos",
    operation_id = "updateVideo",
    summary = "Update a video",
    description = "Owner only. Multipart fields `title`, `description` and `thumbnail` (file) are all optional; blank \
        text fields are ignored. A new thumbnail is uploaded before the row changes, and an upload failure leaves \
        the video untouched.",
    params(("video_id" = String, Path, description = "Video ID (24 hex characters)")),
    request_body(content_type = "multipart/form-data", description = "Optional fields: title, description, thumbnail (file)"),
    responses(
        (status = 200, description = "Video updated", body = VideoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Thumbnail upload failed (UPLOAD_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(video_id = %video_id))]
pub async fn update_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, AppError> {
    let id = parse_id(&video_id, "video")?;
    let existing = find_video(&state.db, id).await?;
    require_owner(&existing, auth_user.user_id, "update")?;

    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut thumbnail: Option<SpooledFile> = None;
    let max_size = state.config.storage.max_blob_size;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("title") => title = non_blank(Some(read_text(field, "title").await?)),
            Some("description") => {
                description = non_blank(Some(read_text(field, "description").await?));
            }
            Some("thumbnail") => {
                thumbnail = Some(spool_field(field, max_size, "thumbnail").await?);
            }
            _ => {}
        }
    }

    if title.is_none() && description.is_none() && thumbnail.is_none() {
        return Ok(Json(existing.into()));
    }
    if let Some(title) = &title {
        validate_title(title, "Title")?;
    }

    let mut active: video::ActiveModel = existing.into();
    if let Some(title) = title {
        active.title = Set(title);
    }
    if let Some(description) = description {
        active.description = Set(description);
    }
    if let Some(thumbnail) = thumbnail {
        let thumbnail = thumbnail.commit(&*state.media, max_size, "thumbnail").await?;
        active.thumbnail = Set(thumbnail.url(&state.config.storage.public_url));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{video_id}",
    tag = "Videos",
    operation_id = "deleteVideo",
    summary = "Delete a video",
    description = "Owner only. Removes the video together with its likes, its comments, likes on those comments and \
        its playlist memberships, in one transaction.",
    params(("video_id" = String, Path, description = "Video ID (24 hex characters)")),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 400, description = "Invalid video id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(video_id = %video_id))]
pub async fn delete_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&video_id, "video")?;
    let id = id.to_hex();

    let txn = state.db.begin().await?;

    let existing = video::Entity::find_by_id(id.clone())
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".into()))?;
    require_owner(&existing, auth_user.user_id, "delete")?;

    like::Entity::delete_many()
        .filter(like::Column::TargetKind.eq(LikeKind::Comment))
        .filter(
            like::Column::TargetId.in_subquery(
                SeaQuery::select()
                    .column(comment::Column::Id)
                    .from(comment::Entity)
                    .and_where(comment::Column::VideoId.eq(id.as_str()))
                    .to_owned(),
            ),
        )
        .exec(&txn)
        .await?;
    like::Entity::delete_many()
        .filter(like::Column::TargetKind.eq(LikeKind::Video))
        .filter(like::Column::TargetId.eq(id.as_str()))
        .exec(&txn)
        .await?;
    comment::Entity::delete_many()
        .filter(comment::Column::VideoId.eq(id.as_str()))
        .exec(&txn)
        .await?;
    playlist_video::Entity::delete_many()
        .filter(playlist_video::Column::VideoId.eq(id.as_str()))
        .exec(&txn)
        .await?;
    video::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/toggle/publish/{video_id}",
    tag = "Videos",
    operation_id = "togglePublishVideo",
    summary = "Flip a video's published flag",
    description = "Owner only. Unpublished videos disappear from the public list and from other users' reads.",
    params(("video_id" = String, Path, description = "Video ID (24 hex characters)")),
    responses(
        (status = 200, description = "Video with the new flag", body = VideoResponse),
        (status = 400, description = "Invalid video id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(video_id = %video_id))]
pub async fn toggle_publish(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoResponse>, AppError> {
    let id = parse_id(&video_id, "video")?;
    let existing = find_video(&state.db, id).await?;
    require_owner(&existing, auth_user.user_id, "update")?;

    let published = existing.is_published;
    let mut active: video::ActiveModel = existing.into();
    active.is_published = Set(!published);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

pub(crate) async fn find_video<C: ConnectionTrait>(
    db: &C,
    id: ObjectId,
) -> Result<video::Model, AppError> {
    video::Entity::find_by_id(id.to_hex())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".into()))
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))
}
