//! Device domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Connectivity status of a delivery device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Connected,
    Disconnected,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceStatus::Connected => write!(f, "connected"),
            DeviceStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// GPS readiness reported by the device alongside location updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpsStatus {
    Ready,
    NotReady,
}

impl std::fmt::Display for GpsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpsStatus::Ready => write!(f, "ready"),
            GpsStatus::NotReady => write!(f, "not_ready"),
        }
    }
}

/// Represents a registered delivery device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    pub device_id: String,
    pub device_name: String,
    pub status: DeviceStatus,
    pub gps_status: GpsStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for registering a device.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceRequest {
    #[validate(length(
        min = 1,
        max = 64,
        message = "Device ID must be between 1 and 64 characters"
    ))]
    pub device_id: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Device name must be between 1 and 100 characters"
    ))]
    pub device_name: String,
}

/// Response payload for device operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub device_id: String,
    pub device_name: String,
    pub status: DeviceStatus,
    pub gps_status: GpsStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        Self {
            device_id: device.device_id,
            device_name: device.device_name,
            status: device.status,
            gps_status: device.gps_status,
            latitude: device.latitude,
            longitude: device.longitude,
            updated_at: device.updated_at,
        }
    }
}

/// Response for listing devices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDevicesResponse {
    pub devices: Vec<DeviceResponse>,
    pub total: usize,
}
