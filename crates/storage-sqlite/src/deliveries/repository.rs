use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use uuid::Uuid;

use careerpath_core::deliveries::{
    DeliveryRepositoryTrait, DeliveryWithPosting, MarkReadOutcome, NewDelivery,
};
use careerpath_core::errors::Result;

use super::model::{joined_row, DeliveryRecordDB, NewDeliveryRecordDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::postings::PostingDB;
use crate::schema::{companies, delivery_records, postings};

/// Inserts one row per delivery, skipping pairs that already exist.
///
/// Must run inside a writer job so it shares the caller's transaction.
pub(crate) fn insert_deliveries(
    conn: &mut SqliteConnection,
    deliveries: &[NewDelivery],
    now: NaiveDateTime,
) -> Result<usize> {
    let mut inserted = 0;
    for delivery in deliveries {
        let row = NewDeliveryRecordDB {
            id: Uuid::new_v4().to_string(),
            subscriber_id: delivery.subscriber_id.clone(),
            posting_id: delivery.posting_id.clone(),
            is_read: false,
            created_at: now,
        };
        inserted += diesel::insert_into(delivery_records::table)
            .values(&row)
            .on_conflict((delivery_records::subscriber_id, delivery_records::posting_id))
            .do_nothing()
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    Ok(inserted)
}

pub struct DeliveryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DeliveryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        DeliveryRepository { pool, writer }
    }
}

#[async_trait]
impl DeliveryRepositoryTrait for DeliveryRepository {
    async fn insert_deliveries_ignore_conflicts(
        &self,
        deliveries: Vec<NewDelivery>,
    ) -> Result<usize> {
        if deliveries.is_empty() {
            return Ok(0);
        }
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                insert_deliveries(conn, &deliveries, Utc::now().naive_utc())
            })
            .await
    }

    fn list_active_for_subscriber(&self, subscriber_id: &str) -> Result<Vec<DeliveryWithPosting>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = delivery_records::table
            .inner_join(postings::table.on(postings::id.eq(delivery_records::posting_id)))
            .left_join(companies::table.on(companies::id.eq(postings::company_id)))
            .filter(delivery_records::subscriber_id.eq(subscriber_id))
            .filter(postings::is_active.eq(true))
            .order((
                delivery_records::is_read.asc(),
                delivery_records::created_at.desc(),
                postings::created_at.desc(),
            ))
            .select((
                DeliveryRecordDB::as_select(),
                PostingDB::as_select(),
                companies::name.nullable(),
            ))
            .load::<(DeliveryRecordDB, PostingDB, Option<String>)>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows
            .into_iter()
            .map(|(delivery, posting, publisher_name)| joined_row(delivery, posting, publisher_name))
            .collect())
    }

    fn count_unread_active(&self, subscriber_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let count = delivery_records::table
            .inner_join(postings::table.on(postings::id.eq(delivery_records::posting_id)))
            .filter(delivery_records::subscriber_id.eq(subscriber_id))
            .filter(delivery_records::is_read.eq(false))
            .filter(postings::is_active.eq(true))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count)
    }

    fn delivered_posting_ids(&self, subscriber_id: &str) -> Result<HashSet<String>> {
        let mut conn = get_connection(&self.pool)?;
        let ids = delivery_records::table
            .filter(delivery_records::subscriber_id.eq(subscriber_id))
            .select(delivery_records::posting_id)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(ids.into_iter().collect())
    }

    fn subscriber_ids_for_posting(&self, posting_id: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        let ids = delivery_records::table
            .filter(delivery_records::posting_id.eq(posting_id))
            .select(delivery_records::subscriber_id)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(ids)
    }

    async fn mark_read(&self, subscriber_id: &str, posting_id: &str) -> Result<MarkReadOutcome> {
        let subscriber_id = subscriber_id.to_string();
        let posting_id = posting_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<MarkReadOutcome> {
                let existing = delivery_records::table
                    .filter(delivery_records::subscriber_id.eq(&subscriber_id))
                    .filter(delivery_records::posting_id.eq(&posting_id))
                    .select(delivery_records::is_read)
                    .first::<bool>(conn)
                    .optional()
                    .map_err(StorageError::from)?;

                let outcome = match existing {
                    None => MarkReadOutcome::NotFound,
                    Some(true) => MarkReadOutcome::AlreadyRead,
                    Some(false) => {
                        let updated = diesel::update(
                            delivery_records::table
                                .filter(delivery_records::subscriber_id.eq(&subscriber_id))
                                .filter(delivery_records::posting_id.eq(&posting_id))
                                .filter(delivery_records::is_read.eq(false)),
                        )
                        .set((
                            delivery_records::is_read.eq(true),
                            delivery_records::read_at.eq(Some(Utc::now().naive_utc())),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                        if updated == 0 {
                            MarkReadOutcome::AlreadyRead
                        } else {
                            MarkReadOutcome::Marked
                        }
                    }
                };
                debug!(
                    "mark_read({}, {}) -> {:?}",
                    subscriber_id, posting_id, outcome
                );
                Ok(outcome)
            })
            .await
    }
}
