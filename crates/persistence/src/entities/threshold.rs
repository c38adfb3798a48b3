//! Distance threshold entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the distance_thresholds table.
#[derive(Debug, Clone, FromRow)]
pub struct DistanceThresholdEntity {
    pub id: i64,
    pub threshold_id: Uuid,
    pub distance: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DistanceThresholdEntity> for domain::models::DistanceThreshold {
    fn from(entity: DistanceThresholdEntity) -> Self {
        Self {
            id: entity.id,
            threshold_id: entity.threshold_id,
            distance: entity.distance,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
