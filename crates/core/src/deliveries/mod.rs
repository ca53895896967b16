//! Deliveries module - per-subscriber delivery records and read state.

mod deliveries_model;
mod deliveries_traits;

pub use deliveries_model::{
    sort_notifications, DeliveryRecord, DeliveryWithPosting, MarkReadOutcome, NewDelivery,
    NotificationItem,
};
pub use deliveries_traits::{ApplicationTrackerTrait, DeliveryRepositoryTrait};
