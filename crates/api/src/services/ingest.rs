//! Inbound WebSocket message dispatch.
//!
//! Every inbound frame is decoded against the envelope and the known body
//! shapes, then routed to its handler. Malformed or unrecognized input is
//! logged and dropped; the connection never sees an error for it.

use tracing::{debug, info, warn};

use crate::app::AppState;
use crate::ws::protocol::{
    BottleComplete, ChatRelay, DeviceBody, Envelope, LocationUpdate, NearOrder, SendTo,
};
use crate::ws::registry::Audience;
use domain::services::geo::Coordinates;
use persistence::repositories::{DeviceRepository, OrderRepository, UserRepository};

/// Device-reported distances under this many kilometers trigger the
/// near-order chat message.
const NEAR_ORDER_KM: f64 = 1.0;

/// Handle one text frame from a device connection.
pub async fn handle_device_message(state: &AppState, device_id: &str, text: &str) {
    let Some(envelope) = Envelope::parse(text) else {
        warn!(device_id = %device_id, "Dropping unparseable device message");
        return;
    };

    match envelope.sendto {
        SendTo::Backend | SendTo::Both => {
            // "both" mirrors the raw frame to every frontend before the
            // backend acts on it.
            if envelope.sendto == SendTo::Both {
                let delivered = state.connections.broadcast(Audience::Frontend, text);
                debug!(device_id = %device_id, delivered, "Mirrored device message to frontends");
            }

            let Some(body) = envelope.object_body() else {
                warn!(device_id = %device_id, "Device message has no object body");
                return;
            };

            match DeviceBody::decode(body) {
                Some(DeviceBody::LocationUpdate(update)) => {
                    location_update(state, device_id, update).await;
                }
                Some(DeviceBody::BottleComplete(bottle)) => {
                    bottle_complete(state, device_id, bottle).await;
                }
                Some(DeviceBody::ChatRelay(relay)) => {
                    chat_relay(state, device_id, relay).await;
                }
                Some(DeviceBody::NearOrder(near)) => {
                    near_order(state, device_id, near).await;
                }
                None => {
                    warn!(device_id = %device_id, "Unrecognized device payload shape");
                }
            }
        }
        SendTo::Device | SendTo::Frontend => {
            debug!(device_id = %device_id, "Device message not addressed to backend");
        }
    }
}

/// Handle one text frame from a frontend connection.
///
/// Frontends may only command devices: `sendto == "device"` with an object
/// body relays the raw frame to every device connection. There is no
/// generic frontend-to-frontend or device-to-frontend path here.
pub async fn handle_frontend_message(state: &AppState, user_id: &str, text: &str) {
    let Some(envelope) = Envelope::parse(text) else {
        warn!(user_id = %user_id, "Dropping unparseable frontend message");
        return;
    };

    if envelope.sendto == SendTo::Device && envelope.object_body().is_some() {
        let delivered = state.connections.broadcast(Audience::Device, text);
        info!(user_id = %user_id, delivered, "Relayed frontend message to devices");
    } else {
        debug!(user_id = %user_id, "Frontend message ignored by relay");
    }
}

/// Persist a GPS update and run the proximity recompute on it.
///
/// The connection's path id is authoritative; the body's device id is only
/// part of the shape.
async fn location_update(state: &AppState, device_id: &str, update: LocationUpdate) {
    if update.device_id != device_id {
        debug!(
            connection_id = %device_id,
            body_id = %update.device_id,
            "Location update body names a different device"
        );
    }

    let repo = DeviceRepository::new(state.pool.clone());
    match repo
        .update_location(
            device_id,
            update.latitude,
            update.longitude,
            update.gps_status.into(),
        )
        .await
    {
        Ok(0) => {
            warn!(device_id = %device_id, "Location update for unknown device");
        }
        Ok(_) => {
            info!(
                device_id = %device_id,
                latitude = update.latitude,
                longitude = update.longitude,
                "Device location updated"
            );
            let position = Coordinates::new(update.latitude, update.longitude);
            crate::services::proximity::recompute(state, position).await;
        }
        Err(e) => {
            warn!(device_id = %device_id, "Failed to update device location: {}", e);
        }
    }
}

/// Record a refill completion report against its order.
async fn bottle_complete(state: &AppState, device_id: &str, bottle: BottleComplete) {
    let repo = OrderRepository::new(state.pool.clone());
    match repo
        .update_bottle_data(
            &bottle.order_id,
            bottle.bottle_count,
            &bottle.time_completed,
            device_id,
        )
        .await
    {
        Ok(0) => warn!(order_id = %bottle.order_id, "Bottle data for unknown order"),
        Ok(_) => info!(
            order_id = %bottle.order_id,
            bottle_count = bottle.bottle_count,
            "Order updated with bottle data"
        ),
        Err(e) => warn!(order_id = %bottle.order_id, "Failed to store bottle data: {}", e),
    }
}

/// Relay a chat message from the driver to a LINE recipient.
async fn chat_relay(state: &AppState, device_id: &str, relay: ChatRelay) {
    state.notifier.send_text(&relay.line_id, &relay.message).await;
    info!(device_id = %device_id, line_id = %relay.line_id, "Chat message relayed");
}

/// Device-computed proximity hint: notify when close, then store the
/// device position it was computed from.
async fn near_order(state: &AppState, device_id: &str, near: NearOrder) {
    let order_repo = OrderRepository::new(state.pool.clone());
    match order_repo.find_by_order_id(&near.order_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!(order_id = %near.order_id, "Near-order report for unknown order");
            return;
        }
        Err(e) => {
            warn!(order_id = %near.order_id, "Failed to look up order: {}", e);
            return;
        }
    }

    let user_repo = UserRepository::new(state.pool.clone());
    let user = match user_repo.find_by_user_id(&near.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(user_id = %near.user_id, "Near-order report for unknown user");
            return;
        }
        Err(e) => {
            warn!(user_id = %near.user_id, "Failed to look up user: {}", e);
            return;
        }
    };

    if near.distance < NEAR_ORDER_KM {
        match user.line_id {
            Some(line_id) => {
                let text = format!(
                    "คุณมีคำสั่งซื้ออยู่ที่ระยะห่างจากคุณ {:.2} กิโลเมตร",
                    near.distance
                );
                state.notifier.send_text(&line_id, &text).await;
                info!(order_id = %near.order_id, "Near-order notification sent");
            }
            None => warn!(user_id = %near.user_id, "User has no LINE id for near-order"),
        }
    }

    let device_repo = DeviceRepository::new(state.pool.clone());
    if let Err(e) = device_repo
        .update_coordinates(device_id, near.latitude, near.longitude)
        .await
    {
        warn!(device_id = %device_id, "Failed to update device coordinates: {}", e);
    }
}
