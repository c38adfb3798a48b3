//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod device;
pub mod order;
pub mod threshold;
pub mod user;

pub use device::{DeviceEntity, DeviceStatusDb, GpsStatusDb};
pub use order::{DeliverStatusDb, DeliveringOrderEntity, OrderEntity, PendingDeliveryEntity};
pub use threshold::DistanceThresholdEntity;
pub use user::UserEntity;
