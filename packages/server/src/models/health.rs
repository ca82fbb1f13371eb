use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: &'static str,
    #[schema(example = "Connected")]
    pub database: &'static str,
}
