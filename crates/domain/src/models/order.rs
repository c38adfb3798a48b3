//! Order domain model.
//!
//! Only the delivery-coordination subset of an order is modeled here;
//! products, pricing, and payment state live outside this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::geo::Coordinates;

/// Delivery lifecycle of an order.
///
/// `pending --prepare-delivery--> delivering --complete--> delivered`;
/// `delivering --cancel--> cancel`. Proximity recomputation only considers
/// orders whose status is exactly `delivering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliverStatus {
    Pending,
    Delivering,
    Delivered,
    Cancel,
}

impl std::fmt::Display for DeliverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliverStatus::Pending => write!(f, "pending"),
            DeliverStatus::Delivering => write!(f, "delivering"),
            DeliverStatus::Delivered => write!(f, "delivered"),
            DeliverStatus::Cancel => write!(f, "cancel"),
        }
    }
}

/// Represents an order as seen by the delivery coordination core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub order_id: String,
    pub user_id: String,
    pub deliver_status: DeliverStatus,
    /// Last computed device-to-destination distance in whole meters.
    pub distance: Option<i64>,
    /// Threshold values already notified for this delivery cycle.
    pub notified_distances: Vec<i32>,
    pub bottle_count: Option<i32>,
    pub time_completed: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An in-flight order joined with its owner's destination and chat identity,
/// the working set of one proximity recompute cycle.
#[derive(Debug, Clone)]
pub struct DeliveringOrder {
    pub order_id: String,
    pub user_id: String,
    /// Destination from the owning user's profile; absent when the user has
    /// no stored coordinates, in which case the order is skipped.
    pub destination: Option<Coordinates>,
    /// External chat identity of the order owner, if linked.
    pub line_id: Option<String>,
    pub notified_distances: Vec<i32>,
}

/// Response payload for order delivery operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: String,
    pub user_id: String,
    pub deliver_status: DeliverStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<i64>,
    pub notified_distances: Vec<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            user_id: order.user_id,
            deliver_status: order.deliver_status,
            distance: order.distance,
            notified_distances: order.notified_distances,
            updated_at: order.updated_at,
        }
    }
}

/// One entry of the prepare-delivery broadcast sent to devices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedOrder {
    pub order_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deliver_status_serialization() {
        assert_eq!(
            serde_json::to_string(&DeliverStatus::Delivering).unwrap(),
            "\"delivering\""
        );
        assert_eq!(
            serde_json::to_string(&DeliverStatus::Cancel).unwrap(),
            "\"cancel\""
        );
    }

    #[test]
    fn test_deliver_status_roundtrip() {
        for status in [
            DeliverStatus::Pending,
            DeliverStatus::Delivering,
            DeliverStatus::Delivered,
            DeliverStatus::Cancel,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: DeliverStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, back);
        }
    }

    #[test]
    fn test_order_response_serialization() {
        let response = OrderResponse {
            order_id: "ORD-1001".to_string(),
            user_id: "U-42".to_string(),
            deliver_status: DeliverStatus::Delivering,
            distance: Some(480),
            notified_distances: vec![1000],
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"deliverStatus\":\"delivering\""));
        assert!(json.contains("\"distance\":480"));
        assert!(json.contains("\"notifiedDistances\":[1000]"));
    }

    #[test]
    fn test_prepared_order_omits_missing_destination() {
        let prepared = PreparedOrder {
            order_id: "ORD-1002".to_string(),
            user_id: "U-7".to_string(),
            latitude: None,
            longitude: None,
        };

        let json = serde_json::to_string(&prepared).unwrap();
        assert!(!json.contains("latitude"));
    }
}
