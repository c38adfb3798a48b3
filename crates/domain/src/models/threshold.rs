//! Distance notification threshold domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A configured notification distance in meters.
///
/// Operators maintain the set of thresholds; the proximity engine reads them
/// sorted farthest-first each recompute cycle. Duplicate values are
/// tolerated (the first match wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceThreshold {
    pub id: i64,
    pub threshold_id: Uuid,
    pub distance: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating or updating a threshold.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DistanceThresholdRequest {
    #[validate(range(
        min = 1,
        max = 100_000,
        message = "Distance must be between 1 and 100000 meters"
    ))]
    pub distance: i32,
}

/// Response payload for threshold operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceThresholdResponse {
    pub threshold_id: Uuid,
    pub distance: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DistanceThreshold> for DistanceThresholdResponse {
    fn from(t: DistanceThreshold) -> Self {
        Self {
            threshold_id: t.threshold_id,
            distance: t.distance,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Response for listing thresholds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDistanceThresholdsResponse {
    pub thresholds: Vec<DistanceThresholdResponse>,
    pub total: usize,
}
