use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use super::error::StorageError;
use super::key::MediaKey;
use super::store::{MediaReader, MediaStore};

const READ_CHUNK: usize = 64 * 1024;

/// Media store backed by a local directory.
///
/// Layout: `{root}/{bucket}/{leaf}` where bucket is the first hex byte of the
/// key. Uploads land in `{root}/.incoming` first and are renamed into place
/// once hashed, so a reader never observes a partially written object.
pub struct FsMediaStore {
    root: PathBuf,
    max_size: u64,
}

impl FsMediaStore {
    pub async fn open(root: impl Into<PathBuf>, max_size: u64) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(root.join(".incoming")).await?;
        Ok(Self { root, max_size })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &MediaKey) -> PathBuf {
        self.root.join(key.bucket()).join(key.leaf())
    }

    fn incoming_path(&self) -> PathBuf {
        self.root
            .join(".incoming")
            .join(uuid::Uuid::new_v4().to_string())
    }

    async fn commit(&self, incoming: &Path, key: &MediaKey) -> Result<(), StorageError> {
        let target = self.object_path(key);
        if fs::try_exists(&target).await? {
            let _ = fs::remove_file(incoming).await;
            return Ok(());
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        if let Err(e) = fs::rename(incoming, &target).await {
            let _ = fs::remove_file(incoming).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn put_stream(&self, mut reader: MediaReader) -> Result<MediaKey, StorageError> {
        let incoming = self.incoming_path();
        let mut file = fs::File::create(&incoming).await?;
        let mut hasher = Sha256::new();
        let mut written: u64 = 0;
        let mut buf = vec![0u8; READ_CHUNK];

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(n) => n,
                Err(e) => {
                    drop(file);
                    let _ = fs::remove_file(&incoming).await;
                    return Err(e.into());
                }
            };
            if n == 0 {
                break;
            }

            written += n as u64;
            if written > self.max_size {
                drop(file);
                let _ = fs::remove_file(&incoming).await;
                return Err(StorageError::TooLarge {
                    actual: written,
                    limit: self.max_size,
                });
            }

            hasher.update(&buf[..n]);
            file.write_all(&buf[..n]).await?;
        }

        file.flush().await?;
        drop(file);

        let key = MediaKey::from_digest(hasher.finalize().into());
        self.commit(&incoming, &key).await?;
        Ok(key)
    }

    async fn get_stream(&self, key: &MediaKey) -> Result<MediaReader, StorageError> {
        match fs::File::open(self.object_path(key)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_hex()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, key: &MediaKey) -> Result<u64, StorageError> {
        match fs::metadata(self.object_path(key)).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_hex()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
