use std::collections::HashSet;

use async_trait::async_trait;

use crate::deliveries::deliveries_model::{DeliveryWithPosting, MarkReadOutcome, NewDelivery};
use crate::errors::Result;

/// Trait for delivery repository operations
#[async_trait]
pub trait DeliveryRepositoryTrait: Send + Sync {
    /// Inserts every delivery whose `(subscriber_id, posting_id)` pair does
    /// not exist yet. Conflicts are skipped silently; returns the number of
    /// rows actually inserted.
    async fn insert_deliveries_ignore_conflicts(&self, deliveries: Vec<NewDelivery>)
        -> Result<usize>;

    /// Deliveries of active postings, unread first then newest first.
    fn list_active_for_subscriber(&self, subscriber_id: &str) -> Result<Vec<DeliveryWithPosting>>;

    /// Unread deliveries of active postings.
    fn count_unread_active(&self, subscriber_id: &str) -> Result<i64>;

    /// Posting ids the subscriber already has a delivery for, active or not.
    fn delivered_posting_ids(&self, subscriber_id: &str) -> Result<HashSet<String>>;

    /// Subscribers holding a delivery of `posting_id`, read or not.
    fn subscriber_ids_for_posting(&self, posting_id: &str) -> Result<Vec<String>>;

    async fn mark_read(&self, subscriber_id: &str, posting_id: &str) -> Result<MarkReadOutcome>;
}

/// Read access to job applications tracked elsewhere on the platform.
pub trait ApplicationTrackerTrait: Send + Sync {
    fn applied_posting_ids(&self, subscriber_id: &str) -> Result<HashSet<String>>;
}
