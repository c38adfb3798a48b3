//! Domain models for the delivery coordination backend.

pub mod device;
pub mod order;
pub mod threshold;

pub use device::{Device, DeviceStatus, GpsStatus};
pub use order::{DeliverStatus, DeliveringOrder, Order};
pub use threshold::DistanceThreshold;
