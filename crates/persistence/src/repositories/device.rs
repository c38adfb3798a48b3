//! Device repository for database operations.

use chrono::Utc;
use sqlx::PgPool;

use crate::entities::{DeviceEntity, DeviceStatusDb, GpsStatusDb};

/// Repository for device-related database operations.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a device by its business id.
    pub async fn find_by_device_id(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, device_id, device_name, status, gps_status,
                   latitude, longitude, created_at, updated_at
            FROM devices
            WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find all devices, sorted by name.
    pub async fn find_all(&self) -> Result<Vec<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, device_id, device_name, status, gps_status,
                   latitude, longitude, created_at, updated_at
            FROM devices
            ORDER BY device_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Upsert a device (insert or update name on conflict).
    /// Returns the device entity after upsert.
    pub async fn upsert_device(
        &self,
        device_id: &str,
        device_name: &str,
    ) -> Result<DeviceEntity, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, DeviceEntity>(
            r#"
            INSERT INTO devices (device_id, device_name, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (device_id) DO UPDATE SET
                device_name = EXCLUDED.device_name,
                updated_at = EXCLUDED.updated_at
            RETURNING id, device_id, device_name, status, gps_status,
                      latitude, longitude, created_at, updated_at
            "#,
        )
        .bind(device_id)
        .bind(device_name)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Overwrite a device's position and GPS readiness.
    /// Returns the number of rows affected (0 if the device is unknown);
    /// no row is created for unknown devices.
    pub async fn update_location(
        &self,
        device_id: &str,
        latitude: f64,
        longitude: f64,
        gps_status: GpsStatusDb,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET latitude = $2, longitude = $3, gps_status = $4, updated_at = $5
            WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .bind(latitude)
        .bind(longitude)
        .bind(gps_status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Overwrite a device's position without touching GPS readiness
    /// (used by device-computed near-order reports).
    pub async fn update_coordinates(
        &self,
        device_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET latitude = $2, longitude = $3, updated_at = $4
            WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .bind(latitude)
        .bind(longitude)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Flip a device's connectivity status (socket open/close).
    /// Returns the number of rows affected.
    pub async fn update_status(
        &self,
        device_id: &str,
        status: DeviceStatusDb,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET status = $2, updated_at = $3
            WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .bind(status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
