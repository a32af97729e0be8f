//! Order handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use vendora_core::error::AppError;
use vendora_core::types::id::OrderId;
use vendora_entity::order::{OrderDetails, SellerOrderView};
use vendora_service::order::CartItem;

use crate::dto::request::{PlaceOrderRequest, UpdateOrderStatusRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderDetails>>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let cart: Vec<CartItem> = req
        .items
        .iter()
        .map(|item| CartItem {
            product_id: item.product.into_uuid(),
            quantity: item.quantity,
        })
        .collect();

    let order = state
        .order_service
        .place_order(auth.context(), &cart, req.customer_info)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

/// PUT /api/orders/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<OrderId>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<OrderDetails>>, ApiError> {
    let order = state
        .order_service
        .update_status(auth.context(), id, req.status)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// GET /api/orders/my-orders
pub async fn my_orders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<OrderDetails>>>, ApiError> {
    let orders = state.order_service.my_orders(auth.context()).await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// GET /api/orders/seller-orders
pub async fn seller_orders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<SellerOrderView>>>, ApiError> {
    let orders = state.order_service.seller_orders(auth.context()).await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<OrderId>,
) -> Result<Json<ApiResponse<OrderDetails>>, ApiError> {
    let order = state.order_service.get_order(auth.context(), id).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// DELETE /api/orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<OrderId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.order_service.delete_order(auth.context(), id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Order deleted".to_string(),
    })))
}
