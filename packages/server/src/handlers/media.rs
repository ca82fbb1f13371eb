use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use tracing::instrument;
use vidnest_common::media::MediaKey;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;
use crate::utils::filename::validate_flat_filename;
use crate::utils::media::build_media_response;

#[utoipa::path(
    get,
    path = "/{hash}/{filename}",
    tag = "Media",
    operation_id = "downloadMedia",
    summary = "Download an uploaded file",
    description = "Streams a stored video or thumbnail. The hash is the content address recorded in the video's URL \
        and doubles as a strong ETag; `If-None-Match` yields 304. The content type follows the file name. Public.",
    params(
        ("hash" = String, Path, description = "Content hash (64 hex characters)"),
        ("filename" = String, Path, description = "File name recorded at upload"),
    ),
    responses(
        (status = 200, description = "File content"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 400, description = "Malformed hash or file name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers), fields(hash = %hash))]
pub async fn download_media(
    State(state): State<AppState>,
    Path((hash, filename)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let key = MediaKey::parse(&hash)?;
    let filename =
        validate_flat_filename(&filename).map_err(|e| AppError::Validation(e.message().into()))?;

    build_media_response(&key, filename, &headers, &*state.media).await
}
