use sea_orm::*;

use crate::entity::like::{self, LikeTarget};
use crate::entity::subscription;
use crate::error::AppError;
use crate::utils::object_id::ObjectId;

/// Which branch a toggle took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Created,
    Removed,
}

impl Toggled {
    /// Whether the relationship exists after the toggle.
    pub fn is_active(self) -> bool {
        self == Toggled::Created
    }
}

/// Delete the rows matching `existing`; if there were none, insert `row`.
///
/// The delete is the atomic decision point: two concurrent toggles can not
/// both remove the same row. Two concurrent inserts are settled by the unique
/// index on the relationship, and the loser gets `Conflict`.
pub async fn toggle<E, C>(
    db: &C,
    existing: Condition,
    row: E::ActiveModel,
    what: &str,
) -> Result<Toggled, AppError>
where
    E: EntityTrait,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
    C: ConnectionTrait,
{
    let deleted = E::delete_many().filter(existing).exec(db).await?;
    if deleted.rows_affected > 0 {
        return Ok(Toggled::Removed);
    }

    match E::insert(row).exec_without_returning(db).await {
        Ok(_) => Ok(Toggled::Created),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            tracing::debug!("Concurrent {} toggle lost the insert race", what);
            Err(AppError::Conflict(format!("{what} changed concurrently, retry")))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn toggle_like<C: ConnectionTrait>(
    db: &C,
    target: LikeTarget,
    actor: ObjectId,
) -> Result<Toggled, AppError> {
    let target_id = target.id().to_hex();
    let liked_by = actor.to_hex();

    let existing = Condition::all()
        .add(like::Column::TargetKind.eq(target.kind()))
        .add(like::Column::TargetId.eq(target_id.as_str()))
        .add(like::Column::LikedBy.eq(liked_by.as_str()));
    let row = like::ActiveModel {
        id: Set(ObjectId::new().to_hex()),
        target_kind: Set(target.kind()),
        target_id: Set(target_id),
        liked_by: Set(liked_by),
        created_at: Set(chrono::Utc::now()),
    };

    toggle::<like::Entity, _>(db, existing, row, "Like").await
}

pub async fn toggle_subscription<C: ConnectionTrait>(
    db: &C,
    channel: ObjectId,
    subscriber: ObjectId,
) -> Result<Toggled, AppError> {
    let channel_id = channel.to_hex();
    let subscriber_id = subscriber.to_hex();

    let existing = Condition::all()
        .add(subscription::Column::ChannelId.eq(channel_id.as_str()))
        .add(subscription::Column::SubscriberId.eq(subscriber_id.as_str()));
    let row = subscription::ActiveModel {
        id: Set(ObjectId::new().to_hex()),
        subscriber_id: Set(subscriber_id),
        channel_id: Set(channel_id),
        created_at: Set(chrono::Utc::now()),
    };

    toggle::<subscription::Entity, _>(db, existing, row, "Subscription").await
}
