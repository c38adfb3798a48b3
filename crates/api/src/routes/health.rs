//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
    pub connections: ConnectionsHealth,
}

/// Database health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseHealth {
    pub connected: bool,
    pub latency_ms: u64,
}

/// Live WebSocket connection counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConnectionsHealth {
    pub devices: usize,
    pub frontends: usize,
}

/// Health check endpoint.
///
/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();
    let db_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    let latency_ms = start.elapsed().as_millis() as u64;

    let status = if db_connected { "ok" } else { "degraded" };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            connected: db_connected,
            latency_ms,
        },
        connections: ConnectionsHealth {
            devices: state.connections.count(crate::ws::Audience::Device),
            frontends: state.connections.count(crate::ws::Audience::Frontend),
        },
    }))
}
