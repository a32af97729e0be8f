//! Health check handler.

use axum::Json;
use axum::extract::State;

use vendora_core::traits::LiveStore;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = state.db.health_check().await.unwrap_or(false);
    let live_store = state.live.health_check().await.unwrap_or(false);

    let status = if database && live_store { "ok" } else { "degraded" };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        live_store,
    }))
}
