use std::sync::Arc;

use sea_orm::DatabaseConnection;
use vidnest_common::media::MediaStore;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub media: Arc<dyn MediaStore>,
}
