mod error;
mod key;
mod store;

pub mod fs;

pub use error::StorageError;
pub use key::MediaKey;
pub use store::{MediaReader, MediaStore};
