//! Order entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::DeliverStatus;
use domain::services::Coordinates;
use sqlx::FromRow;

/// Database enum that maps to the PostgreSQL `deliver_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "deliver_status", rename_all = "lowercase")]
pub enum DeliverStatusDb {
    Pending,
    Delivering,
    Delivered,
    Cancel,
}

impl From<DeliverStatusDb> for DeliverStatus {
    fn from(status: DeliverStatusDb) -> Self {
        match status {
            DeliverStatusDb::Pending => DeliverStatus::Pending,
            DeliverStatusDb::Delivering => DeliverStatus::Delivering,
            DeliverStatusDb::Delivered => DeliverStatus::Delivered,
            DeliverStatusDb::Cancel => DeliverStatus::Cancel,
        }
    }
}

impl From<DeliverStatus> for DeliverStatusDb {
    fn from(status: DeliverStatus) -> Self {
        match status {
            DeliverStatus::Pending => DeliverStatusDb::Pending,
            DeliverStatus::Delivering => DeliverStatusDb::Delivering,
            DeliverStatus::Delivered => DeliverStatusDb::Delivered,
            DeliverStatus::Cancel => DeliverStatusDb::Cancel,
        }
    }
}

/// Database row mapping for the orders table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderEntity {
    pub id: i64,
    pub order_id: String,
    pub user_id: String,
    pub deliver_status: DeliverStatusDb,
    pub distance: Option<i64>,
    pub notified_distances: Vec<i32>,
    pub bottle_count: Option<i32>,
    pub time_completed: Option<String>,
    pub device_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderEntity> for domain::models::Order {
    fn from(entity: OrderEntity) -> Self {
        Self {
            id: entity.id,
            order_id: entity.order_id,
            user_id: entity.user_id,
            deliver_status: entity.deliver_status.into(),
            distance: entity.distance,
            notified_distances: entity.notified_distances,
            bottle_count: entity.bottle_count,
            time_completed: entity.time_completed,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Row mapping for the delivering-orders join used by the proximity engine:
/// each in-flight order with its owner's destination and chat identity.
#[derive(Debug, Clone, FromRow)]
pub struct DeliveringOrderEntity {
    pub order_id: String,
    pub user_id: String,
    pub destination_latitude: Option<f64>,
    pub destination_longitude: Option<f64>,
    pub line_id: Option<String>,
    pub notified_distances: Vec<i32>,
}

impl From<DeliveringOrderEntity> for domain::models::DeliveringOrder {
    fn from(entity: DeliveringOrderEntity) -> Self {
        let destination = match (entity.destination_latitude, entity.destination_longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        };
        Self {
            order_id: entity.order_id,
            user_id: entity.user_id,
            destination,
            line_id: entity.line_id,
            notified_distances: entity.notified_distances,
        }
    }
}

/// Row mapping for the pending-orders join returned by prepare-delivery.
#[derive(Debug, Clone, FromRow)]
pub struct PendingDeliveryEntity {
    pub order_id: String,
    pub user_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivering_order_entity_with_destination() {
        let entity = DeliveringOrderEntity {
            order_id: "ORD-1".to_string(),
            user_id: "U-1".to_string(),
            destination_latitude: Some(13.76),
            destination_longitude: Some(100.505),
            line_id: Some("U123".to_string()),
            notified_distances: vec![1000],
        };

        let order: domain::models::DeliveringOrder = entity.into();
        let destination = order.destination.unwrap();
        assert_eq!(destination.latitude, 13.76);
        assert_eq!(destination.longitude, 100.505);
        assert_eq!(order.notified_distances, vec![1000]);
    }

    #[test]
    fn test_delivering_order_entity_partial_destination_is_none() {
        let entity = DeliveringOrderEntity {
            order_id: "ORD-2".to_string(),
            user_id: "U-2".to_string(),
            destination_latitude: Some(13.76),
            destination_longitude: None,
            line_id: None,
            notified_distances: vec![],
        };

        let order: domain::models::DeliveringOrder = entity.into();
        assert!(order.destination.is_none());
    }

    #[test]
    fn test_order_entity_to_domain() {
        let entity = OrderEntity {
            id: 7,
            order_id: "ORD-3".to_string(),
            user_id: "U-3".to_string(),
            deliver_status: DeliverStatusDb::Delivering,
            distance: Some(480),
            notified_distances: vec![1000],
            bottle_count: None,
            time_completed: None,
            device_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let order: domain::models::Order = entity.into();
        assert_eq!(order.deliver_status, DeliverStatus::Delivering);
        assert_eq!(order.distance, Some(480));
    }
}
