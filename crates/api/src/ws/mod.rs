//! Realtime WebSocket layer.
//!
//! Two audiences connect here: delivery devices (`/ws/device/:device_id`)
//! and dashboard/app frontends (`/ws/frontend/:user_id`). The registry owns
//! the live connection handles; the protocol module decodes the message
//! envelope; the server module runs the per-connection loops.

pub mod protocol;
pub mod registry;
pub mod server;

pub use registry::{Audience, ConnectionRegistry};
