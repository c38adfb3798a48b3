//! Proximity recompute cycle.
//!
//! Runs once per accepted device location update, never on a timer:
//! staleness is bounded by how often the device reports. The distance math
//! and threshold selection are pure functions in the domain crate; this
//! module does the I/O around them and dispatches notifications.

use std::collections::HashMap;

use metrics::counter;
use tracing::{info, warn};

use crate::app::AppState;
use domain::models::DeliveringOrder;
use domain::services::geo::Coordinates;
use domain::services::notification::{ChatNotifier, NotificationResult};
use domain::services::proximity::evaluate_orders;
use persistence::repositories::{DistanceThresholdRepository, OrderRepository};

/// Recompute distances for every delivering order against a device position
/// and fire newly crossed threshold notifications.
pub async fn recompute(state: &AppState, device: Coordinates) {
    let order_repo = OrderRepository::new(state.pool.clone());

    let entities = match order_repo.find_delivering_with_destination().await {
        Ok(entities) => entities,
        Err(e) => {
            warn!("Failed to load delivering orders: {}", e);
            return;
        }
    };
    if entities.is_empty() {
        return;
    }

    let threshold_repo = DistanceThresholdRepository::new(state.pool.clone());
    let thresholds: Vec<i32> = match threshold_repo.find_all_descending().await {
        Ok(entities) => entities.into_iter().map(|t| t.distance).collect(),
        Err(e) => {
            warn!("Failed to load notification thresholds: {}", e);
            return;
        }
    };

    let orders: Vec<DeliveringOrder> = entities.into_iter().map(Into::into).collect();
    let outcomes = evaluate_orders(device, &orders, &thresholds);

    let by_id: HashMap<&str, &DeliveringOrder> =
        orders.iter().map(|o| (o.order_id.as_str(), o)).collect();

    for outcome in outcomes {
        // The recomputed distance is overwritten every cycle, notification
        // or not.
        if let Err(e) = order_repo
            .update_distance(&outcome.order_id, outcome.distance)
            .await
        {
            warn!(order_id = %outcome.order_id, "Failed to persist distance: {}", e);
        }

        let Some(threshold) = outcome.crossed else {
            continue;
        };

        // The atomic append is the deduplication point: only the cycle that
        // actually inserted the value sends the message.
        match order_repo
            .mark_threshold_notified(&outcome.order_id, threshold)
            .await
        {
            Ok(true) => {
                let Some(order) = by_id.get(outcome.order_id.as_str()) else {
                    continue;
                };
                info!(
                    order_id = %outcome.order_id,
                    distance = outcome.distance,
                    threshold,
                    "Notification threshold crossed"
                );
                notify_customer(state.notifier.as_ref(), order, outcome.distance).await;
            }
            Ok(false) => {
                // A concurrent recompute got there first.
            }
            Err(e) => {
                warn!(order_id = %outcome.order_id, "Failed to record threshold: {}", e);
            }
        }
    }
}

/// Tell the order owner how far away their delivery is.
///
/// The threshold is already marked notified at this point; a push failure
/// is logged and accepted, never rolled back.
pub async fn notify_customer(notifier: &dyn ChatNotifier, order: &DeliveringOrder, distance: i64) {
    let Some(line_id) = order.line_id.as_deref() else {
        info!(order_id = %order.order_id, "Order owner has no LINE id, skipping notification");
        counter!("proximity_notifications_total", "result" => "no_recipient").increment(1);
        return;
    };

    let text = format!("คุณมีคำสั่งซื้ออยู่ห่างจากคุณ {} เมตร", distance);
    match notifier.send_text(line_id, &text).await {
        NotificationResult::Sent => {
            counter!("proximity_notifications_total", "result" => "sent").increment(1);
        }
        NotificationResult::NoRecipient => {
            counter!("proximity_notifications_total", "result" => "no_recipient").increment(1);
        }
        NotificationResult::Failed(reason) => {
            warn!(order_id = %order.order_id, "Notification push failed: {}", reason);
            counter!("proximity_notifications_total", "result" => "failed").increment(1);
        }
    }
}
