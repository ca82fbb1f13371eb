use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::health::HealthResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    operation_id = "healthcheck",
    summary = "Liveness and database connectivity",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 503, description = "Database unreachable (UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn healthcheck(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.db.ping().await.map_err(|e| {
        tracing::warn!("Database ping failed: {}", e);
        AppError::Unavailable("Database not connected".into())
    })?;

    Ok(Json(HealthResponse {
        status: "OK",
        database: "Connected",
    }))
}
