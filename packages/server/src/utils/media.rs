use std::path::PathBuf;

use axum::body::Body;
use axum::extract::multipart::Field;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use uuid::Uuid;
use vidnest_common::media::{MediaKey, MediaReader, MediaStore, StorageError};

use crate::error::AppError;
use crate::utils::filename::url_safe_filename;

/// A file accepted by the media store.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub key: MediaKey,
    pub filename: String,
    pub size: u64,
}

impl StoredMedia {
    /// Durable URL recorded on the owning row, `{public_url}/{key}/{filename}`.
    pub fn url(&self, public_url: &str) -> String {
        format!(
            "{}/{}/{}",
            public_url.trim_end_matches('/'),
            self.key,
            self.filename
        )
    }
}

/// An uploaded file parked in a temp file until the rest of the request has
/// been validated. Dropping it removes the temp file.
#[derive(Debug)]
pub struct SpooledFile {
    path: PathBuf,
    filename: String,
    size: u64,
}

impl SpooledFile {
    /// Move the spooled bytes into the media store.
    ///
    /// Oversized uploads are the client's fault (`Validation`); anything else
    /// the store rejects is `UploadFailed`.
    pub async fn commit(
        mut self,
        store: &dyn MediaStore,
        max_size: u64,
        what: &str,
    ) -> Result<StoredMedia, AppError> {
        let file = tokio::fs::File::open(&self.path)
            .await
            .map_err(|e| AppError::UploadFailed(format!("Failed to reopen temp file: {e}")))?;
        let reader: MediaReader = Box::new(file);
        let key = store.put_stream(reader).await.map_err(|e| match e {
            StorageError::TooLarge { .. } => {
                AppError::Validation(format!("File exceeds maximum size of {max_size} bytes"))
            }
            other => AppError::UploadFailed(format!("Failed to upload {what}: {other}")),
        })?;

        Ok(StoredMedia {
            key,
            filename: std::mem::take(&mut self.filename),
            size: self.size,
        })
    }
}

impl Drop for SpooledFile {
    fn drop(&mut self) {
        // Best effort.
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Spool a multipart file field to a temp file, enforcing `max_size`.
///
/// `what` names the field in error messages ("video", "thumbnail"). Nothing
/// reaches the media store until [`SpooledFile::commit`].
pub async fn spool_field(
    mut field: Field<'_>,
    max_size: u64,
    what: &str,
) -> Result<SpooledFile, AppError> {
    let mut spooled = SpooledFile {
        path: std::env::temp_dir().join(format!("vidnest-upload-{}", Uuid::new_v4())),
        filename: url_safe_filename(field.file_name(), what),
        size: 0,
    };

    let mut temp_file = tokio::fs::File::create(&spooled.path)
        .await
        .map_err(|e| AppError::UploadFailed(format!("Failed to create temp file: {e}")))?;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        spooled.size += chunk.len() as u64;
        if spooled.size > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        temp_file
            .write_all(&chunk)
            .await
            .map_err(|e| AppError::UploadFailed(format!("Temp file write failed: {e}")))?;
    }

    if spooled.size == 0 {
        return Err(AppError::Validation(format!("{} file is empty", capitalize(what))));
    }

    temp_file
        .flush()
        .await
        .map_err(|e| AppError::UploadFailed(format!("Temp file flush failed: {e}")))?;

    Ok(spooled)
}

/// Stream a stored object back with caching headers. The key doubles as a
/// strong ETag.
pub async fn build_media_response(
    key: &MediaKey,
    filename: &str,
    headers: &HeaderMap,
    store: &dyn MediaStore,
) -> Result<Response, AppError> {
    let etag_value = format!("\"{key}\"");
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let size = store.size(key).await?;
    let reader = store.get_stream(key).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string();

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(filename),
        )
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

/// Build a safe `Content-Disposition` header value.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };

    // RFC 5987 percent-encoding for filename*.
    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                String::from(b as char)
            }
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("inline; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
