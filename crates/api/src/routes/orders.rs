//! Order delivery lifecycle endpoint handlers.
//!
//! Only the delivery-facing operations live here; order creation, payment,
//! and reporting belong to another service.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::ws::Audience;
use domain::models::order::{Order, OrderResponse, PreparedOrder};
use persistence::repositories::OrderRepository;

/// Response for the prepare-delivery bulk operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareDeliveryResponse {
    pub started: usize,
    pub notified_devices: usize,
    pub orders: Vec<PreparedOrder>,
}

/// Move every pending order into delivery and push the route to devices.
///
/// POST /api/v1/orders/prepare-delivery
///
/// The broadcast carries each order's destination so the device can start
/// computing its own approach. Orders whose owner has no coordinates are
/// still started; the proximity engine skips them until a destination
/// exists.
pub async fn prepare_delivery(
    State(state): State<AppState>,
) -> Result<Json<PrepareDeliveryResponse>, ApiError> {
    let repo = OrderRepository::new(state.pool.clone());

    let pending = repo.find_pending_with_destination().await?;
    if pending.is_empty() {
        return Err(ApiError::NotFound("No pending orders to deliver".to_string()));
    }

    let started = repo.start_pending_deliveries().await? as usize;

    let orders: Vec<PreparedOrder> = pending
        .into_iter()
        .map(|entity| PreparedOrder {
            order_id: entity.order_id,
            user_id: entity.user_id,
            latitude: entity.latitude,
            longitude: entity.longitude,
        })
        .collect();

    let command = serde_json::json!({
        "type": "prepare_delivery",
        "orders": &orders,
    });
    let notified_devices = state
        .connections
        .broadcast(Audience::Device, &command.to_string());

    info!(started, notified_devices, "Delivery round started");

    Ok(Json(PrepareDeliveryResponse {
        started,
        notified_devices,
        orders,
    }))
}

/// Mark an order delivered.
///
/// PUT /api/v1/orders/:order_id/complete
pub async fn complete_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let repo = OrderRepository::new(state.pool.clone());
    let entity = repo
        .complete_order(&order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    let order: Order = entity.into();
    info!(order_id = %order.order_id, "Order completed");

    Ok(Json(order.into()))
}

/// Cancel an order.
///
/// PUT /api/v1/orders/:order_id/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let repo = OrderRepository::new(state.pool.clone());

    match repo.cancel_order(&order_id).await? {
        Some(entity) => {
            let order: Order = entity.into();
            info!(order_id = %order.order_id, "Order cancelled");
            Ok(Json(order.into()))
        }
        None => {
            // Distinguish an unknown order from one already cancelled
            if repo.find_by_order_id(&order_id).await?.is_some() {
                Err(ApiError::Conflict("Order is already cancelled".to_string()))
            } else {
                Err(ApiError::NotFound("Order not found".to_string()))
            }
        }
    }
}
