//! Pure proximity evaluation.
//!
//! One recompute cycle takes the device position, the set of delivering
//! orders, and the configured thresholds sorted farthest-first, and decides
//! per order which distance to persist and whether a threshold was newly
//! crossed. All I/O (queries, updates, chat pushes) stays in the caller.

use crate::models::order::DeliveringOrder;
use crate::services::geo::{distance_meters, Coordinates};

/// Result of evaluating a single delivering order against a device position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProximityOutcome {
    pub order_id: String,
    /// Recomputed distance in whole meters, persisted unconditionally.
    pub distance: i64,
    /// Threshold value newly crossed this cycle, at most one per order.
    pub crossed: Option<i32>,
}

/// Pick the threshold a notification should fire for, if any.
///
/// Thresholds are walked farthest-first; the first value that contains the
/// current distance and has not been notified yet wins, and the walk stops
/// there. A cycle therefore produces at most one notification per order even
/// when the distance satisfies several thresholds at once.
pub fn newly_crossed_threshold(
    distance: i64,
    thresholds_desc: &[i32],
    notified: &[i32],
) -> Option<i32> {
    for &threshold in thresholds_desc {
        if i64::from(threshold) >= distance && !notified.contains(&threshold) {
            return Some(threshold);
        }
    }
    None
}

/// Evaluate every delivering order for one device position.
///
/// Orders without destination coordinates are skipped entirely: no distance,
/// no notification.
pub fn evaluate_orders(
    device: Coordinates,
    orders: &[DeliveringOrder],
    thresholds_desc: &[i32],
) -> Vec<ProximityOutcome> {
    orders
        .iter()
        .filter_map(|order| {
            let destination = order.destination?;
            let distance = distance_meters(device, destination);
            let crossed =
                newly_crossed_threshold(distance, thresholds_desc, &order.notified_distances);
            Some(ProximityOutcome {
                order_id: order.order_id.clone(),
                distance,
                crossed,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, destination: Option<Coordinates>, notified: Vec<i32>) -> DeliveringOrder {
        DeliveringOrder {
            order_id: id.to_string(),
            user_id: format!("user-{id}"),
            destination,
            line_id: Some("U123".to_string()),
            notified_distances: notified,
        }
    }

    #[test]
    fn test_no_threshold_satisfied_outside_farthest() {
        // 1200 m is outside every threshold; nothing fires.
        assert_eq!(newly_crossed_threshold(1200, &[1000, 500, 100], &[]), None);
    }

    #[test]
    fn test_farthest_matching_threshold_wins() {
        assert_eq!(
            newly_crossed_threshold(800, &[1000, 500, 100], &[]),
            Some(1000)
        );
    }

    #[test]
    fn test_already_notified_falls_through_to_nearer_threshold() {
        assert_eq!(
            newly_crossed_threshold(400, &[1000, 500, 100], &[1000]),
            Some(500)
        );
    }

    #[test]
    fn test_all_satisfied_thresholds_notified() {
        assert_eq!(
            newly_crossed_threshold(50, &[1000, 500, 100], &[1000, 500, 100]),
            None
        );
    }

    #[test]
    fn test_duplicate_threshold_values_fire_once() {
        assert_eq!(
            newly_crossed_threshold(400, &[500, 500, 100], &[]),
            Some(500)
        );
        assert_eq!(
            newly_crossed_threshold(400, &[500, 500, 100], &[500]),
            Some(100)
        );
    }

    #[test]
    fn test_at_most_once_per_threshold_over_approach_sequence() {
        // Device closes in over four cycles; each threshold fires exactly once.
        let thresholds = [1000, 500, 100];
        let mut notified: Vec<i32> = Vec::new();
        let mut fired: Vec<i32> = Vec::new();

        for distance in [1200, 800, 400, 50] {
            if let Some(t) = newly_crossed_threshold(distance, &thresholds, &notified) {
                notified.push(t);
                fired.push(t);
            }
        }

        assert_eq!(fired, vec![1000, 500, 100]);
        assert_eq!(notified, vec![1000, 500, 100]);
    }

    #[test]
    fn test_single_notification_even_when_skipping_thresholds() {
        // Jumping straight from far away to 50 m fires only the farthest
        // threshold this cycle; the rest wait for later cycles.
        assert_eq!(
            newly_crossed_threshold(50, &[1000, 500, 100], &[]),
            Some(1000)
        );
    }

    #[test]
    fn test_evaluate_skips_order_without_destination() {
        let device = Coordinates::new(13.7563, 100.5018);
        let orders = vec![order("ORD-1", None, vec![])];

        let outcomes = evaluate_orders(device, &orders, &[1000]);
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_evaluate_no_delivering_orders_is_noop() {
        let device = Coordinates::new(13.7563, 100.5018);
        let outcomes = evaluate_orders(device, &[], &[1000]);
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_evaluate_end_to_end_fixture() {
        // Device on Rama I Road, destination a few blocks north-east,
        // single 1000 m threshold: distance lands near 480 m and the
        // threshold fires.
        let device = Coordinates::new(13.7563, 100.5018);
        let destination = Coordinates::new(13.7600, 100.5050);
        let orders = vec![order("ORD-1001", Some(destination), vec![])];

        let outcomes = evaluate_orders(device, &orders, &[1000]);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].order_id, "ORD-1001");
        assert!((450..=510).contains(&outcomes[0].distance));
        assert_eq!(outcomes[0].crossed, Some(1000));
    }

    #[test]
    fn test_evaluate_mixed_orders() {
        let device = Coordinates::new(13.7563, 100.5018);
        let near = Coordinates::new(13.7600, 100.5050);
        let orders = vec![
            order("ORD-A", Some(near), vec![]),
            order("ORD-B", None, vec![]),
            order("ORD-C", Some(near), vec![1000]),
        ];

        let outcomes = evaluate_orders(device, &orders, &[1000]);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].crossed, Some(1000));
        // Same distance, but the threshold has already been notified.
        assert_eq!(outcomes[1].crossed, None);
        assert_eq!(outcomes[0].distance, outcomes[1].distance);
    }
}
