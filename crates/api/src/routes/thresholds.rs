//! Distance notification threshold endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::threshold::{
    DistanceThreshold, DistanceThresholdRequest, DistanceThresholdResponse,
    ListDistanceThresholdsResponse,
};
use persistence::repositories::DistanceThresholdRepository;

/// List configured thresholds, farthest first.
///
/// GET /api/v1/distance-notifications
pub async fn list_thresholds(
    State(state): State<AppState>,
) -> Result<Json<ListDistanceThresholdsResponse>, ApiError> {
    let repo = DistanceThresholdRepository::new(state.pool.clone());
    let entities = repo.find_all_descending().await?;

    let thresholds: Vec<DistanceThresholdResponse> = entities
        .into_iter()
        .map(|e| {
            let t: DistanceThreshold = e.into();
            t.into()
        })
        .collect();

    let total = thresholds.len();

    Ok(Json(ListDistanceThresholdsResponse { thresholds, total }))
}

/// Create a new threshold.
///
/// POST /api/v1/distance-notifications
pub async fn create_threshold(
    State(state): State<AppState>,
    Json(request): Json<DistanceThresholdRequest>,
) -> Result<(StatusCode, Json<DistanceThresholdResponse>), ApiError> {
    request.validate()?;

    let repo = DistanceThresholdRepository::new(state.pool.clone());
    let entity = repo.create(request.distance).await?;

    let threshold: DistanceThreshold = entity.into();
    let response: DistanceThresholdResponse = threshold.into();

    info!(
        threshold_id = %response.threshold_id,
        distance = response.distance,
        "Distance threshold created"
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a threshold's distance.
///
/// PUT /api/v1/distance-notifications/:threshold_id
pub async fn update_threshold(
    State(state): State<AppState>,
    Path(threshold_id): Path<Uuid>,
    Json(request): Json<DistanceThresholdRequest>,
) -> Result<Json<DistanceThresholdResponse>, ApiError> {
    request.validate()?;

    let repo = DistanceThresholdRepository::new(state.pool.clone());
    let entity = repo
        .update(threshold_id, request.distance)
        .await?
        .ok_or_else(|| ApiError::NotFound("Distance threshold not found".to_string()))?;

    let threshold: DistanceThreshold = entity.into();
    let response: DistanceThresholdResponse = threshold.into();

    info!(threshold_id = %response.threshold_id, "Distance threshold updated");

    Ok(Json(response))
}

/// Delete a threshold.
///
/// DELETE /api/v1/distance-notifications/:threshold_id
pub async fn delete_threshold(
    State(state): State<AppState>,
    Path(threshold_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = DistanceThresholdRepository::new(state.pool.clone());
    let rows_affected = repo.delete(threshold_id).await?;

    if rows_affected == 0 {
        return Err(ApiError::NotFound(
            "Distance threshold not found".to_string(),
        ));
    }

    info!(threshold_id = %threshold_id, "Distance threshold deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_request_deserialization() {
        let json = r#"{"distance": 750}"#;
        let request: DistanceThresholdRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.distance, 750);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_threshold_request_out_of_range() {
        let json = r#"{"distance": 0}"#;
        let request: DistanceThresholdRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }
}
