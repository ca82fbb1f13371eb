use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::shared::UserProfile;

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionToggleResponse {
    /// Whether the actor is subscribed after the call.
    pub subscribed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriberItem {
    pub subscriber: UserProfile,
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriberListResponse {
    pub data: Vec<SubscriberItem>,
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscribedChannelItem {
    pub channel: UserProfile,
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscribedChannelListResponse {
    pub data: Vec<SubscribedChannelItem>,
    pub total: u64,
}
