//! WebSocket connection handling.
//!
//! Each connection runs as its own task: a writer task drains an mpsc
//! channel into the socket while the reader loop processes inbound frames
//! one at a time, so messages from a single connection are handled
//! sequentially while connections stay independent of each other.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::AppState;
use crate::services::ingest;
use crate::ws::registry::Audience;
use persistence::entities::DeviceStatusDb;
use persistence::repositories::DeviceRepository;

/// Device WebSocket upgrade handler.
///
/// GET /ws/device/:device_id
pub async fn device_ws_handler(
    ws: WebSocketUpgrade,
    Path(device_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, Audience::Device, device_id))
}

/// Frontend WebSocket upgrade handler.
///
/// GET /ws/frontend/:user_id
pub async fn frontend_ws_handler(
    ws: WebSocketUpgrade,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, Audience::Frontend, user_id))
}

/// Run one connection to completion.
async fn handle_socket(socket: WebSocket, state: AppState, audience: Audience, id: String) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Writer task: everything addressed to this connection goes through the
    // channel so broadcasts never block on a slow socket write.
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_tx.send(msg).await.is_err() {
                break;
            }
        }
    });

    let token = state.connections.register(audience, &id, tx.clone());

    counter!("ws_connections_total", "audience" => audience.as_str()).increment(1);
    gauge!("ws_active_connections", "audience" => audience.as_str())
        .set(state.connections.count(audience) as f64);

    info!(audience = audience.as_str(), id = %id, "Connection opened");

    if audience == Audience::Device {
        set_device_status(&state, &id, DeviceStatusDb::Connected).await;
    }

    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Text(text)) => match audience {
                Audience::Device => ingest::handle_device_message(&state, &id, &text).await,
                Audience::Frontend => ingest::handle_frontend_message(&state, &id, &text).await,
            },
            Ok(Message::Ping(data)) => {
                if tx.send(Message::Pong(data)).is_err() {
                    break;
                }
            }
            Ok(Message::Pong(_)) => {}
            Ok(Message::Binary(_)) => {
                debug!(audience = audience.as_str(), id = %id, "Ignoring binary frame");
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                warn!(audience = audience.as_str(), id = %id, "WebSocket error: {}", e);
                break;
            }
        }
    }

    state.connections.unregister(audience, &id, token);
    send_task.abort();

    if audience == Audience::Device {
        set_device_status(&state, &id, DeviceStatusDb::Disconnected).await;
    }

    counter!("ws_disconnections_total", "audience" => audience.as_str()).increment(1);
    gauge!("ws_active_connections", "audience" => audience.as_str())
        .set(state.connections.count(audience) as f64);

    info!(audience = audience.as_str(), id = %id, "Connection closed");
}

/// Best-effort connectivity flag on the device row.
async fn set_device_status(state: &AppState, device_id: &str, status: DeviceStatusDb) {
    let repo = DeviceRepository::new(state.pool.clone());
    match repo.update_status(device_id, status).await {
        Ok(0) => debug!(device_id = %device_id, "No device row to update status on"),
        Ok(_) => {}
        Err(e) => warn!(device_id = %device_id, "Failed to update device status: {}", e),
    }
}
