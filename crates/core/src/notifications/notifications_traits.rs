use async_trait::async_trait;

use crate::deliveries::{MarkReadOutcome, NotificationItem};
use crate::errors::Result;
use crate::notifications::notifications_model::ReconcileOutcome;

/// Trait for the subscriber-facing notification operations
#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    /// Active-posting notifications, unread first then newest first.
    /// Reconciles the subscriber first.
    async fn list_for_subscriber(&self, subscriber_id: &str) -> Result<Vec<NotificationItem>>;

    /// Unread notifications on active postings. Reconciles the subscriber
    /// first.
    async fn unread_count(&self, subscriber_id: &str) -> Result<i64>;

    /// One-way unread → read transition. Cached reads for the subscriber are
    /// dropped before this returns.
    async fn mark_read(&self, subscriber_id: &str, posting_id: &str) -> Result<MarkReadOutcome>;

    /// Runs a reconciliation pass on its own.
    async fn reconcile(&self, subscriber_id: &str) -> Result<ReconcileOutcome>;
}
