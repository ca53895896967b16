//! Database models for delivery records.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use careerpath_core::deliveries::{DeliveryRecord, DeliveryWithPosting};

use crate::postings::PostingDB;

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::delivery_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DeliveryRecordDB {
    pub id: String,
    pub subscriber_id: String,
    pub posting_id: String,
    pub is_read: bool,
    pub read_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::delivery_records)]
pub struct NewDeliveryRecordDB {
    pub id: String,
    pub subscriber_id: String,
    pub posting_id: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl From<DeliveryRecordDB> for DeliveryRecord {
    fn from(db: DeliveryRecordDB) -> Self {
        Self {
            id: db.id,
            subscriber_id: db.subscriber_id,
            posting_id: db.posting_id,
            is_read: db.is_read,
            read_at: db.read_at,
            created_at: db.created_at,
        }
    }
}

/// Builds the joined read row from a delivery, its posting and the
/// publisher's display name.
pub(crate) fn joined_row(
    delivery: DeliveryRecordDB,
    posting: PostingDB,
    publisher_name: Option<String>,
) -> DeliveryWithPosting {
    DeliveryWithPosting {
        delivery: delivery.into(),
        title: posting.title,
        position: posting.position,
        location: posting.location,
        salary_range: posting.salary_range,
        application_deadline: posting.application_deadline,
        posting_created_at: posting.created_at,
        publisher_id: posting.company_id,
        publisher_name,
    }
}
