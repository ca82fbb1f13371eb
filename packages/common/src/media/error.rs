use std::fmt;

/// Errors raised by a [`MediaStore`](super::MediaStore).
#[derive(Debug)]
pub enum StorageError {
    /// No media object is stored under the requested key.
    NotFound(String),
    /// The backing medium failed.
    Io(std::io::Error),
    /// A media key failed to parse.
    InvalidKey(String),
    /// The upload is larger than the store accepts.
    TooLarge { actual: u64, limit: u64 },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "media not found: {key}"),
            Self::Io(err) => write!(f, "media store IO error: {err}"),
            Self::InvalidKey(msg) => write!(f, "invalid media key: {msg}"),
            Self::TooLarge { actual, limit } => {
                write!(f, "upload exceeds size limit ({actual} > {limit} bytes)")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
