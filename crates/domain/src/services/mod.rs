//! Domain services for the delivery coordination core.
//!
//! Services contain business logic that operates on domain models.

pub mod geo;
pub mod notification;
pub mod proximity;

pub use geo::{distance_meters, floor_meters, Coordinates};
pub use notification::{ChatNotifier, NotificationResult, RecordingChatNotifier};
pub use proximity::{evaluate_orders, newly_crossed_threshold, ProximityOutcome};
