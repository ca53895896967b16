//! Delivery record domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// "Subscriber X was offered posting Y", with its read state.
///
/// At most one exists per `(subscriber_id, posting_id)`; `is_read` only ever
/// moves from `false` to `true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub id: String,
    pub subscriber_id: String,
    pub posting_id: String,
    pub is_read: bool,
    pub read_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewDelivery {
    pub subscriber_id: String,
    pub posting_id: String,
}

impl NewDelivery {
    pub fn new(subscriber_id: impl Into<String>, posting_id: impl Into<String>) -> Self {
        Self {
            subscriber_id: subscriber_id.into(),
            posting_id: posting_id.into(),
        }
    }
}

/// A delivery joined with the display data of its posting and publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryWithPosting {
    pub delivery: DeliveryRecord,
    pub title: String,
    pub position: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub posting_created_at: NaiveDateTime,
    pub publisher_id: String,
    pub publisher_name: Option<String>,
}

/// One entry of a subscriber's notification list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    pub delivery_id: String,
    pub posting_id: String,
    pub title: String,
    pub position: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub publisher_id: String,
    pub publisher_name: Option<String>,
    pub is_read: bool,
    pub read_at: Option<NaiveDateTime>,
    pub delivered_at: NaiveDateTime,
    pub posting_created_at: NaiveDateTime,
    pub has_applied: bool,
}

impl NotificationItem {
    pub fn from_delivery(row: DeliveryWithPosting, has_applied: bool) -> Self {
        Self {
            delivery_id: row.delivery.id,
            posting_id: row.delivery.posting_id,
            title: row.title,
            position: row.position,
            location: row.location,
            salary_range: row.salary_range,
            application_deadline: row.application_deadline,
            publisher_id: row.publisher_id,
            publisher_name: row.publisher_name,
            is_read: row.delivery.is_read,
            read_at: row.delivery.read_at,
            delivered_at: row.delivery.created_at,
            posting_created_at: row.posting_created_at,
            has_applied,
        }
    }
}

/// Sorts unread first, then newest delivery first.
pub fn sort_notifications(items: &mut [NotificationItem]) {
    items.sort_by(|a, b| {
        a.is_read
            .cmp(&b.is_read)
            .then_with(|| b.delivered_at.cmp(&a.delivered_at))
            .then_with(|| b.posting_created_at.cmp(&a.posting_created_at))
    });
}

/// What `mark_read` found.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MarkReadOutcome {
    Marked,
    AlreadyRead,
    NotFound,
}
