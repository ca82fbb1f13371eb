use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers::{dashboard, health, like, media, playlist, subscription, video};
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/healthcheck", health_routes())
        .nest("/videos", video_routes(config))
        .nest("/likes", like_routes())
        .nest("/subscriptions", subscription_routes())
        .nest("/playlists", playlist_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/media", media_routes())
}

fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health::healthcheck))
}

fn video_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(video::list_videos, video::publish_video))
        .routes(routes!(
            video::get_video,
            video::update_video,
            video::delete_video
        ))
        .routes(routes!(video::toggle_publish))
        .layer(video::upload_body_limit(config.storage.max_blob_size))
}

fn like_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(like::toggle_video_like))
        .routes(routes!(like::toggle_comment_like))
        .routes(routes!(like::toggle_tweet_like))
        .routes(routes!(like::list_liked_videos))
}

fn subscription_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            subscription::toggle_channel_subscription,
            subscription::list_subscribers
        ))
        .routes(routes!(subscription::list_subscribed_channels))
}

fn playlist_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(playlist::create_playlist))
        .routes(routes!(playlist::list_user_playlists))
        .routes(routes!(
            playlist::get_playlist,
            playlist::update_playlist,
            playlist::delete_playlist
        ))
        .routes(routes!(playlist::add_video))
        .routes(routes!(playlist::remove_video))
}

fn dashboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(dashboard::channel_stats))
        .routes(routes!(dashboard::channel_videos))
}

fn media_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(media::download_media))
}
