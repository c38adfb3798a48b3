//! Order repository for database operations.

use chrono::Utc;
use sqlx::PgPool;

use crate::entities::{DeliveringOrderEntity, OrderEntity, PendingDeliveryEntity};

/// Repository for order-related database operations.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Creates a new OrderRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an order by its business id.
    pub async fn find_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<OrderEntity>, sqlx::Error> {
        sqlx::query_as::<_, OrderEntity>(
            r#"
            SELECT id, order_id, user_id, deliver_status, distance, notified_distances,
                   bottle_count, time_completed, device_id, created_at, updated_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// All in-flight orders joined with their owner's destination and chat
    /// identity, the input of one proximity recompute cycle.
    pub async fn find_delivering_with_destination(
        &self,
    ) -> Result<Vec<DeliveringOrderEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeliveringOrderEntity>(
            r#"
            SELECT o.order_id, o.user_id,
                   u.latitude AS destination_latitude,
                   u.longitude AS destination_longitude,
                   u.line_id, o.notified_distances
            FROM orders o
            JOIN users u ON o.user_id = u.user_id
            WHERE o.deliver_status = 'delivering'
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Overwrite the computed device-to-destination distance for an order.
    pub async fn update_distance(
        &self,
        order_id: &str,
        distance: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET distance = $2, updated_at = $3
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .bind(distance)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Record a threshold as notified for an order.
    ///
    /// Membership test and append happen in a single statement, so two
    /// concurrent recompute cycles cannot both claim the same threshold.
    /// Returns true when this call appended the value (the caller should
    /// dispatch the notification), false when it was already present.
    pub async fn mark_threshold_notified(
        &self,
        order_id: &str,
        threshold: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET notified_distances = array_append(notified_distances, $2), updated_at = $3
            WHERE order_id = $1
              AND deliver_status = 'delivering'
              AND NOT ($2 = ANY(notified_distances))
            "#,
        )
        .bind(order_id)
        .bind(threshold)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Pending orders joined with their owner's destination, for the
    /// prepare-delivery broadcast.
    pub async fn find_pending_with_destination(
        &self,
    ) -> Result<Vec<PendingDeliveryEntity>, sqlx::Error> {
        sqlx::query_as::<_, PendingDeliveryEntity>(
            r#"
            SELECT o.order_id, o.user_id, u.latitude, u.longitude
            FROM orders o
            JOIN users u ON o.user_id = u.user_id
            WHERE o.deliver_status = 'pending'
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Move every pending order to delivering.
    /// Returns the number of rows affected.
    pub async fn start_pending_deliveries(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET deliver_status = 'delivering', updated_at = $1
            WHERE deliver_status = 'pending'
            "#,
        )
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark an order delivered.
    pub async fn complete_order(&self, order_id: &str) -> Result<Option<OrderEntity>, sqlx::Error> {
        sqlx::query_as::<_, OrderEntity>(
            r#"
            UPDATE orders
            SET deliver_status = 'delivered', updated_at = $2
            WHERE order_id = $1
            RETURNING id, order_id, user_id, deliver_status, distance, notified_distances,
                      bottle_count, time_completed, device_id, created_at, updated_at
            "#,
        )
        .bind(order_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    /// Cancel an order, unless it is already cancelled.
    /// Returns None both for unknown ids and already-cancelled orders;
    /// callers disambiguate with [`find_by_order_id`](Self::find_by_order_id).
    pub async fn cancel_order(&self, order_id: &str) -> Result<Option<OrderEntity>, sqlx::Error> {
        sqlx::query_as::<_, OrderEntity>(
            r#"
            UPDATE orders
            SET deliver_status = 'cancel', updated_at = $2
            WHERE order_id = $1 AND deliver_status <> 'cancel'
            RETURNING id, order_id, user_id, deliver_status, distance, notified_distances,
                      bottle_count, time_completed, device_id, created_at, updated_at
            "#,
        )
        .bind(order_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    /// Store the bottle-completion report a device sends after a refill.
    pub async fn update_bottle_data(
        &self,
        order_id: &str,
        bottle_count: i32,
        time_completed: &str,
        device_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET bottle_count = $2, time_completed = $3, device_id = $4, updated_at = $5
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .bind(bottle_count)
        .bind(time_completed)
        .bind(device_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
