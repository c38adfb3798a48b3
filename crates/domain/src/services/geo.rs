//! Great-circle distance between a device and a delivery destination.

use geo::{point, HaversineDistance};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Truncate a raw meter distance to whole meters.
///
/// Floor, not round: 999.9 m is reported as 999. Distances are clamped at
/// zero before truncation.
pub fn floor_meters(raw_meters: f64) -> i64 {
    raw_meters.max(0.0).floor() as i64
}

/// Haversine distance between two coordinates, floored to whole meters.
pub fn distance_meters(from: Coordinates, to: Coordinates) -> i64 {
    let a = point!(x: from.longitude, y: from.latitude);
    let b = point!(x: to.longitude, y: to.latitude);
    floor_meters(a.haversine_distance(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_not_round() {
        assert_eq!(floor_meters(1499.99), 1499);
        assert_eq!(floor_meters(999.9), 999);
        assert_eq!(floor_meters(480.0), 480);
        assert_eq!(floor_meters(0.4), 0);
    }

    #[test]
    fn test_distance_never_negative() {
        assert_eq!(floor_meters(-3.2), 0);
    }

    #[test]
    fn test_zero_distance_for_identical_points() {
        let p = Coordinates::new(13.7563, 100.5018);
        assert_eq!(distance_meters(p, p), 0);
    }

    #[test]
    fn test_reference_distance_paris_london() {
        // Notre-Dame to Westminster, published great-circle distance ~340.6 km.
        let paris = Coordinates::new(48.8530, 2.3499);
        let london = Coordinates::new(51.4994, -0.1245);

        let meters = distance_meters(paris, london) as f64;
        let reference = 340_600.0;
        assert!(
            (meters - reference).abs() / reference < 0.005,
            "distance {} outside 0.5% of reference {}",
            meters,
            reference
        );
    }

    #[test]
    fn test_reference_distance_bangkok_block() {
        // Device on Rama I Road to a destination a few blocks away; the pair
        // from the delivery fixture, expected just under half a kilometer.
        let device = Coordinates::new(13.7563, 100.5018);
        let destination = Coordinates::new(13.7600, 100.5050);

        let meters = distance_meters(device, destination);
        assert!(
            (450..=510).contains(&meters),
            "expected ~480 m, got {}",
            meters
        );
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinates::new(13.7563, 100.5018);
        let b = Coordinates::new(13.7600, 100.5050);
        assert_eq!(distance_meters(a, b), distance_meters(b, a));
    }
}
