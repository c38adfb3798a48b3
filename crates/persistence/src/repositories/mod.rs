//! Repository implementations.

pub mod device;
pub mod order;
pub mod threshold;
pub mod user;

pub use device::DeviceRepository;
pub use order::OrderRepository;
pub use threshold::DistanceThresholdRepository;
pub use user::UserRepository;
