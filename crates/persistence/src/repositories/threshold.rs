//! Distance threshold repository for database operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::DistanceThresholdEntity;

/// Repository for notification threshold database operations.
#[derive(Clone)]
pub struct DistanceThresholdRepository {
    pool: PgPool,
}

impl DistanceThresholdRepository {
    /// Creates a new DistanceThresholdRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All thresholds sorted farthest-first, the order the proximity engine
    /// walks them in.
    pub async fn find_all_descending(&self) -> Result<Vec<DistanceThresholdEntity>, sqlx::Error> {
        sqlx::query_as::<_, DistanceThresholdEntity>(
            r#"
            SELECT id, threshold_id, distance, created_at, updated_at
            FROM distance_thresholds
            ORDER BY distance DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Create a new threshold.
    pub async fn create(&self, distance: i32) -> Result<DistanceThresholdEntity, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, DistanceThresholdEntity>(
            r#"
            INSERT INTO distance_thresholds (distance, created_at, updated_at)
            VALUES ($1, $2, $2)
            RETURNING id, threshold_id, distance, created_at, updated_at
            "#,
        )
        .bind(distance)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Update a threshold's distance.
    pub async fn update(
        &self,
        threshold_id: Uuid,
        distance: i32,
    ) -> Result<Option<DistanceThresholdEntity>, sqlx::Error> {
        sqlx::query_as::<_, DistanceThresholdEntity>(
            r#"
            UPDATE distance_thresholds
            SET distance = $2, updated_at = $3
            WHERE threshold_id = $1
            RETURNING id, threshold_id, distance, created_at, updated_at
            "#,
        )
        .bind(threshold_id)
        .bind(distance)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a threshold.
    /// Returns the number of rows affected (0 if not found).
    pub async fn delete(&self, threshold_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM distance_thresholds
            WHERE threshold_id = $1
            "#,
        )
        .bind(threshold_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Seed the default threshold when the table is empty, so a fresh
    /// deployment notifies at 1 km out of the box.
    pub async fn ensure_default(&self, default_distance: i32) -> Result<(), sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM distance_thresholds
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        if count.0 == 0 {
            self.create(default_distance).await?;
            tracing::info!(
                distance = default_distance,
                "Seeded default distance threshold"
            );
        }
        Ok(())
    }
}
