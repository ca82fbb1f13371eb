use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::key::MediaKey;

pub type MediaReader = Box<dyn AsyncRead + Unpin + Send>;

/// Durable storage for uploaded video files and thumbnails.
///
/// Objects are content-addressed: the key returned by an upload is derived
/// from the bytes, never chosen by the caller.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn put(&self, data: &[u8]) -> Result<MediaKey, StorageError> {
        let reader: MediaReader = Box::new(Cursor::new(data.to_vec()));
        self.put_stream(reader).await
    }

    /// Consume `reader` to the end and store its bytes.
    async fn put_stream(&self, reader: MediaReader) -> Result<MediaKey, StorageError>;

    async fn get(&self, key: &MediaKey) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(key).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    async fn get_stream(&self, key: &MediaKey) -> Result<MediaReader, StorageError>;

    /// Stored size in bytes.
    async fn size(&self, key: &MediaKey) -> Result<u64, StorageError>;
}
