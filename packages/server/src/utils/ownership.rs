use crate::entity::{playlist, video};
use crate::error::AppError;
use crate::utils::object_id::ObjectId;

/// A resource with a single recorded owner.
pub trait Owned {
    /// Noun used in error messages.
    const KIND: &'static str;

    fn owner_id(&self) -> &str;
}

impl Owned for video::Model {
    const KIND: &'static str = "video";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for playlist::Model {
    const KIND: &'static str = "playlist";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

/// Fail with `PermissionDenied` unless `actor` owns `resource`.
///
/// `action` completes "You are not allowed to {action} this {kind}".
pub fn require_owner<R: Owned>(resource: &R, actor: ObjectId, action: &str) -> Result<(), AppError> {
    if resource.owner_id() == actor.to_hex() {
        return Ok(());
    }
    Err(AppError::PermissionDenied(format!(
        "You are not allowed to {action} this {}",
        R::KIND
    )))
}
