//! Notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use vendora_core::types::pagination::PageResponse;
use vendora_entity::notification::{Notification, NotificationRef};

use crate::dto::response::{ApiResponse, MarkedResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Notification>>>, ApiError> {
    let page = state
        .notification_service
        .list(auth.context(), params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// PATCH /api/notifications/{id}/read
///
/// The path id may be either the primary-store id or the mirror id.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Notification>>, ApiError> {
    let notification = state
        .notification_service
        .mark_read(auth.context(), &NotificationRef::parse(&id))
        .await?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// PATCH /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MarkedResponse>>, ApiError> {
    let marked = state
        .notification_service
        .mark_all_read(auth.context())
        .await?;
    Ok(Json(ApiResponse::ok(MarkedResponse { marked })))
}

/// DELETE /api/notifications/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .notification_service
        .delete(auth.context(), &NotificationRef::parse(&id))
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Notification deleted".to_string(),
    })))
}
