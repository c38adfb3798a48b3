//! Device entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{DeviceStatus, GpsStatus};
use sqlx::FromRow;

/// Database enum that maps to the PostgreSQL `device_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "device_status", rename_all = "snake_case")]
pub enum DeviceStatusDb {
    Connected,
    Disconnected,
}

impl From<DeviceStatusDb> for DeviceStatus {
    fn from(status: DeviceStatusDb) -> Self {
        match status {
            DeviceStatusDb::Connected => DeviceStatus::Connected,
            DeviceStatusDb::Disconnected => DeviceStatus::Disconnected,
        }
    }
}

impl From<DeviceStatus> for DeviceStatusDb {
    fn from(status: DeviceStatus) -> Self {
        match status {
            DeviceStatus::Connected => DeviceStatusDb::Connected,
            DeviceStatus::Disconnected => DeviceStatusDb::Disconnected,
        }
    }
}

/// Database enum that maps to the PostgreSQL `gps_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "gps_status", rename_all = "snake_case")]
pub enum GpsStatusDb {
    Ready,
    NotReady,
}

impl From<GpsStatusDb> for GpsStatus {
    fn from(status: GpsStatusDb) -> Self {
        match status {
            GpsStatusDb::Ready => GpsStatus::Ready,
            GpsStatusDb::NotReady => GpsStatus::NotReady,
        }
    }
}

impl From<GpsStatus> for GpsStatusDb {
    fn from(status: GpsStatus) -> Self {
        match status {
            GpsStatus::Ready => GpsStatusDb::Ready,
            GpsStatus::NotReady => GpsStatusDb::NotReady,
        }
    }
}

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: i64,
    pub device_id: String,
    pub device_name: String,
    pub status: DeviceStatusDb,
    pub gps_status: GpsStatusDb,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DeviceEntity> for domain::models::Device {
    fn from(entity: DeviceEntity) -> Self {
        Self {
            id: entity.id,
            device_id: entity.device_id,
            device_name: entity.device_name,
            status: entity.status.into(),
            gps_status: entity.gps_status.into(),
            latitude: entity.latitude,
            longitude: entity.longitude,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_entity_to_domain() {
        let entity = DeviceEntity {
            id: 1,
            device_id: "RPI-001".to_string(),
            device_name: "Truck 1".to_string(),
            status: DeviceStatusDb::Connected,
            gps_status: GpsStatusDb::Ready,
            latitude: Some(13.7563),
            longitude: Some(100.5018),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let device: domain::models::Device = entity.into();
        assert_eq!(device.device_id, "RPI-001");
        assert_eq!(device.status, DeviceStatus::Connected);
        assert_eq!(device.gps_status, GpsStatus::Ready);
        assert_eq!(device.latitude, Some(13.7563));
    }

    #[test]
    fn test_status_conversions_roundtrip() {
        assert_eq!(
            DeviceStatusDb::from(DeviceStatus::Connected),
            DeviceStatusDb::Connected
        );
        assert_eq!(GpsStatus::from(GpsStatusDb::NotReady), GpsStatus::NotReady);
    }
}
