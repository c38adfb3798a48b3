//! Device endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::device::{DeviceResponse, ListDevicesResponse, RegisterDeviceRequest};
use domain::models::Device;
use persistence::repositories::DeviceRepository;

/// Register a device (idempotent upsert by device id).
///
/// POST /api/v1/devices
pub async fn register_device(
    State(state): State<AppState>,
    Json(request): Json<RegisterDeviceRequest>,
) -> Result<(StatusCode, Json<DeviceResponse>), ApiError> {
    request.validate()?;

    let repo = DeviceRepository::new(state.pool.clone());
    let entity = repo
        .upsert_device(&request.device_id, &request.device_name)
        .await?;

    let device: Device = entity.into();
    let response: DeviceResponse = device.into();

    info!(device_id = %response.device_id, "Device registered");

    Ok((StatusCode::CREATED, Json(response)))
}

/// List all devices.
///
/// GET /api/v1/devices
pub async fn list_devices(
    State(state): State<AppState>,
) -> Result<Json<ListDevicesResponse>, ApiError> {
    let repo = DeviceRepository::new(state.pool.clone());
    let entities = repo.find_all().await?;

    let devices: Vec<DeviceResponse> = entities
        .into_iter()
        .map(|e| {
            let d: Device = e.into();
            d.into()
        })
        .collect();

    let total = devices.len();

    Ok(Json(ListDevicesResponse { devices, total }))
}

/// Get a single device by its business id.
///
/// GET /api/v1/devices/:device_id
pub async fn get_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let repo = DeviceRepository::new(state.pool.clone());
    let entity = repo
        .find_by_device_id(&device_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device not found".to_string()))?;

    let device: Device = entity.into();
    Ok(Json(device.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_device_request_deserialization() {
        let json = r#"{"deviceId": "RPI-001", "deviceName": "Truck 1"}"#;
        let request: RegisterDeviceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.device_id, "RPI-001");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_device_request_missing_name_fails() {
        let json = r#"{"deviceId": "RPI-001"}"#;
        let result: Result<RegisterDeviceRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
