//! Live connection registry.
//!
//! Keeps the outbound sender for every open WebSocket, keyed by the
//! connecting party's business id. Registry state is in-memory only; a
//! restart drops all connections and clients reconnect.

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// The two independent connection populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Device,
    Frontend,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Device => "device",
            Audience::Frontend => "frontend",
        }
    }
}

/// Outbound handle for one live connection.
#[derive(Debug, Clone)]
struct ConnectionHandle {
    /// Identifies the connection instance, so a stale close cannot evict a
    /// replacement registered under the same id.
    token: Uuid,
    tx: mpsc::UnboundedSender<Message>,
}

/// Concurrency-safe registry of device and frontend connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    devices: DashMap<String, ConnectionHandle>,
    frontends: DashMap<String, ConnectionHandle>,
}

impl ConnectionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, audience: Audience) -> &DashMap<String, ConnectionHandle> {
        match audience {
            Audience::Device => &self.devices,
            Audience::Frontend => &self.frontends,
        }
    }

    /// Register a connection, replacing any existing entry for the id.
    /// Returns the instance token to pass back on unregister.
    pub fn register(
        &self,
        audience: Audience,
        id: &str,
        tx: mpsc::UnboundedSender<Message>,
    ) -> Uuid {
        let token = Uuid::new_v4();
        let replaced = self
            .map(audience)
            .insert(id.to_string(), ConnectionHandle { token, tx })
            .is_some();
        info!(
            audience = audience.as_str(),
            id = %id,
            replaced,
            "Connection registered"
        );
        token
    }

    /// Remove a connection if it still belongs to the given instance.
    /// No-op when the id is absent or was re-registered since.
    pub fn unregister(&self, audience: Audience, id: &str, token: Uuid) {
        let removed = self
            .map(audience)
            .remove_if(id, |_, handle| handle.token == token)
            .is_some();
        if removed {
            info!(audience = audience.as_str(), id = %id, "Connection unregistered");
        } else {
            debug!(
                audience = audience.as_str(),
                id = %id,
                "Stale unregister ignored"
            );
        }
    }

    /// Send a text payload to every connection of an audience.
    ///
    /// Send failures (a connection mid-close) are logged per entry and do
    /// not stop delivery to the rest. Returns how many sends were accepted.
    pub fn broadcast(&self, audience: Audience, payload: &str) -> usize {
        let mut delivered = 0;
        for (id, tx) in self.snapshot(audience) {
            if tx.send(Message::Text(payload.to_string())).is_ok() {
                delivered += 1;
            } else {
                debug!(
                    audience = audience.as_str(),
                    id = %id,
                    "Dropping broadcast to closed connection"
                );
            }
        }
        delivered
    }

    /// Point-in-time copy of the id → sender mapping for an audience.
    /// Entries may close concurrently; senders fail harmlessly afterwards.
    pub fn snapshot(&self, audience: Audience) -> Vec<(String, mpsc::UnboundedSender<Message>)> {
        self.map(audience)
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().tx.clone()))
            .collect()
    }

    /// Number of live connections for an audience.
    pub fn count(&self, audience: Audience) -> usize {
        self.map(audience).len()
    }
}
