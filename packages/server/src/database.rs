use std::time::Duration;

use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::entity::{comment, like, playlist, playlist_video, subscription, video};

/// Connect, sync the schema from the entity definitions and make sure the
/// relationship indexes exist.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.clone());

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(config.sqlx_logging);
    if let Some(idle) = config.idle_timeout_secs {
        opt.idle_timeout(Duration::from_secs(idle));
    }

    let db = Database::connect(opt).await?;
    db.get_schema_registry("vidnest_server::entity::*")
        .sync(&db)
        .await?;
    ensure_indexes(&db).await?;

    Ok(db)
}

/// Unique indexes back the toggle and membership invariants, so failing to
/// create one is fatal. Lookup indexes only log.
pub async fn ensure_indexes<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let unique = [
        Index::create()
            .if_not_exists()
            .unique()
            .name("uq_likes_actor_target")
            .table(like::Entity)
            .col(like::Column::LikedBy)
            .col(like::Column::TargetKind)
            .col(like::Column::TargetId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .unique()
            .name("uq_subscription_pair")
            .table(subscription::Entity)
            .col(subscription::Column::SubscriberId)
            .col(subscription::Column::ChannelId)
            .to_owned(),
    ];
    for stmt in &unique {
        create_index(db, stmt).await?;
    }
    info!("Ensured {} unique indexes exist", unique.len());

    let lookup = [
        Index::create()
            .if_not_exists()
            .name("idx_video_owner_created")
            .table(video::Entity)
            .col(video::Column::OwnerId)
            .col(video::Column::CreatedAt)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_likes_target")
            .table(like::Entity)
            .col(like::Column::TargetKind)
            .col(like::Column::TargetId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_comment_video")
            .table(comment::Entity)
            .col(comment::Column::VideoId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_subscription_channel")
            .table(subscription::Entity)
            .col(subscription::Column::ChannelId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_playlist_owner")
            .table(playlist::Entity)
            .col(playlist::Column::OwnerId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_playlist_video_video")
            .table(playlist_video::Entity)
            .col(playlist_video::Column::VideoId)
            .to_owned(),
    ];
    for stmt in &lookup {
        if let Err(e) = create_index(db, stmt).await {
            tracing::warn!("Failed to create lookup index: {}", e);
        }
    }

    Ok(())
}

async fn create_index<C: ConnectionTrait>(
    db: &C,
    stmt: &IndexCreateStatement,
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    db.execute_raw(backend.build(stmt)).await?;
    Ok(())
}
