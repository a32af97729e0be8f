//! Inventory handlers.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use vendora_core::error::AppError;
use vendora_core::types::id::ProductId;
use vendora_entity::inventory::{InventoryRecord, InventoryUpsert};

use crate::dto::request::UpsertInventoryRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/inventory/upsert
pub async fn upsert(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpsertInventoryRequest>,
) -> Result<Json<ApiResponse<InventoryRecord>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let record = state
        .inventory_service
        .upsert(
            auth.context(),
            InventoryUpsert {
                product_id: req.product_id,
                quantity_available: req.quantity_available,
                warehouse_location: req.warehouse_location,
                minimum_stock_alert: req.minimum_stock_alert,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(record)))
}

/// GET /api/inventory/{product_id}
pub async fn get_by_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ApiResponse<InventoryRecord>>, ApiError> {
    let record = state
        .inventory_service
        .get_by_product(product_id.into_uuid())
        .await?;
    Ok(Json(ApiResponse::ok(record)))
}
