use axum::Json;
use axum::extract::{Path, State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{subscription, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::subscription::*;
use crate::state::AppState;
use crate::utils::enrich::user_profiles;
use crate::utils::object_id::{ObjectId, parse_id};
use crate::utils::toggle::toggle_subscription;

#[utoipa::path(
    post,
    path = "/c/{channel_id}",
    tag = "Subscriptions",
    operation_id = "toggleSubscription",
    summary = "Subscribe to or unsubscribe from a channel",
    description = "Removes the caller's subscription to the channel if present, otherwise adds one. \
        Subscribing to yourself is rejected.",
    params(("channel_id" = String, Path, description = "Channel (user) ID (24 hex characters)")),
    responses(
        (status = 200, description = "New subscription state", body = SubscriptionToggleResponse),
        (status = 400, description = "Invalid channel id or self-subscription (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Channel not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Concurrent toggle (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(channel_id = %channel_id, user_id = %auth_user.user_id))]
pub async fn toggle_channel_subscription(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<Json<SubscriptionToggleResponse>, AppError> {
    let channel = parse_id(&channel_id, "channel")?;
    if channel == auth_user.user_id {
        return Err(AppError::Validation(
            "You cannot subscribe to yourself".into(),
        ));
    }
    find_user(&state.db, channel, "Channel not found").await?;

    let toggled = toggle_subscription(&state.db, channel, auth_user.user_id).await?;
    Ok(Json(SubscriptionToggleResponse {
        subscribed: toggled.is_active(),
    }))
}

#[utoipa::path(
    get,
    path = "/c/{channel_id}",
    tag = "Subscriptions",
    operation_id = "listChannelSubscribers",
    summary = "List a channel's subscribers",
    description = "Newest subscription first.",
    params(("channel_id" = String, Path, description = "Channel (user) ID (24 hex characters)")),
    responses(
        (status = 200, description = "Subscribers", body = SubscriberListResponse),
        (status = 400, description = "Invalid channel id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(channel_id = %channel_id))]
pub async fn list_subscribers(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<Json<SubscriberListResponse>, AppError> {
    let channel = parse_id(&channel_id, "channel")?;

    let rows = subscription::Entity::find()
        .filter(subscription::Column::ChannelId.eq(channel.to_hex()))
        .order_by_desc(subscription::Column::CreatedAt)
        .order_by_desc(subscription::Column::Id)
        .all(&state.db)
        .await?;

    let mut profiles =
        user_profiles(&state.db, rows.iter().map(|s| s.subscriber_id.clone())).await?;
    let data: Vec<SubscriberItem> = rows
        .into_iter()
        .filter_map(|s| {
            profiles
                .remove(&s.subscriber_id)
                .map(|subscriber| SubscriberItem {
                    subscriber,
                    subscribed_at: s.created_at,
                })
        })
        .collect();

    Ok(Json(SubscriberListResponse {
        total: data.len() as u64,
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/u/{subscriber_id}",
    tag = "Subscriptions",
    operation_id = "listSubscribedChannels",
    summary = "List channels a user subscribes to",
    description = "Newest subscription first.",
    params(("subscriber_id" = String, Path, description = "Subscriber (user) ID (24 hex characters)")),
    responses(
        (status = 200, description = "Subscribed channels", body = SubscribedChannelListResponse),
        (status = 400, description = "Invalid subscriber id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(subscriber_id = %subscriber_id))]
pub async fn list_subscribed_channels(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
) -> Result<Json<SubscribedChannelListResponse>, AppError> {
    let subscriber = parse_id(&subscriber_id, "subscriber")?;

    let rows = subscription::Entity::find()
        .filter(subscription::Column::SubscriberId.eq(subscriber.to_hex()))
        .order_by_desc(subscription::Column::CreatedAt)
        .order_by_desc(subscription::Column::Id)
        .all(&state.db)
        .await?;

    let mut profiles = user_profiles(&state.db, rows.iter().map(|s| s.channel_id.clone())).await?;
    let data: Vec<SubscribedChannelItem> = rows
        .into_iter()
        .filter_map(|s| {
            profiles
                .remove(&s.channel_id)
                .map(|channel| SubscribedChannelItem {
                    channel,
                    subscribed_at: s.created_at,
                })
        })
        .collect();

    Ok(Json(SubscribedChannelListResponse {
        total: data.len() as u64,
        data,
    }))
}

pub(crate) async fn find_user<C: ConnectionTrait>(
    db: &C,
    id: ObjectId,
    missing: &str,
) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id.to_hex())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(missing.to_string()))
}
