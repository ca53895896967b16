use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use careerpath_core::deliveries::NewDelivery;
use careerpath_core::errors::{Error, Result};
use careerpath_core::postings::{
    NewPosting, Posting, PostingRepositoryTrait, PostingUpdate, PublishOutcome,
};

use super::model::{NewPostingDB, PostingDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::deliveries::insert_deliveries;
use crate::errors::StorageError;
use crate::schema::postings;

pub struct PostingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PostingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PostingRepository { pool, writer }
    }
}

fn load_posting(conn: &mut SqliteConnection, posting_id: &str) -> Result<PostingDB> {
    postings::table
        .find(posting_id)
        .select(PostingDB::as_select())
        .first::<PostingDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| Error::NotFound(format!("posting {}", posting_id)))
}

#[async_trait]
impl PostingRepositoryTrait for PostingRepository {
    fn get_posting(&self, posting_id: &str) -> Result<Option<Posting>> {
        let mut conn = get_connection(&self.pool)?;
        let posting = postings::table
            .find(posting_id)
            .select(PostingDB::as_select())
            .first::<PostingDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(posting.map(Posting::from))
    }

    fn list_postings_by_publisher(&self, publisher_id: &str) -> Result<Vec<Posting>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = postings::table
            .filter(postings::company_id.eq(publisher_id))
            .order(postings::created_at.desc())
            .select(PostingDB::as_select())
            .load::<PostingDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Posting::from).collect())
    }

    fn list_active_postings_since(&self, since: Option<NaiveDateTime>) -> Result<Vec<Posting>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = postings::table
            .filter(postings::is_active.eq(true))
            .into_boxed();
        if let Some(since) = since {
            query = query.filter(postings::created_at.ge(since));
        }
        let rows = query
            .order(postings::created_at.desc())
            .select(PostingDB::as_select())
            .load::<PostingDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Posting::from).collect())
    }

    async fn create_posting_with_deliveries(
        &self,
        publisher_id: &str,
        new_posting: NewPosting,
        subscriber_ids: Vec<String>,
    ) -> Result<PublishOutcome> {
        let publisher_id = publisher_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PublishOutcome> {
                let now = Utc::now().naive_utc();
                let posting_db = NewPostingDB::from_domain(
                    Uuid::new_v4().to_string(),
                    &publisher_id,
                    new_posting,
                    now,
                )?;

                let inserted = diesel::insert_into(postings::table)
                    .values(&posting_db)
                    .returning(PostingDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                let deliveries: Vec<NewDelivery> = subscriber_ids
                    .into_iter()
                    .map(|subscriber_id| NewDelivery::new(subscriber_id, inserted.id.as_str()))
                    .collect();
                let deliveries_created = insert_deliveries(conn, &deliveries, now)?;

                Ok(PublishOutcome {
                    posting: Posting::from(inserted),
                    deliveries_created,
                })
            })
            .await
    }

    async fn update_posting(&self, posting_id: &str, update: PostingUpdate) -> Result<Posting> {
        let posting_id = posting_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Posting> {
                let mut posting = Posting::from(load_posting(conn, &posting_id)?);
                update.apply_to(&mut posting);
                posting.updated_at = Utc::now().naive_utc();

                let posting_db = PostingDB::try_from(posting)?;
                let updated = diesel::update(postings::table.find(&posting_id))
                    .set(&posting_db)
                    .returning(PostingDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Posting::from(updated))
            })
            .await
    }

    async fn set_posting_active(&self, posting_id: &str, is_active: bool) -> Result<Posting> {
        let posting_id = posting_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Posting> {
                load_posting(conn, &posting_id)?;
                let updated = diesel::update(postings::table.find(&posting_id))
                    .set((
                        postings::is_active.eq(is_active),
                        postings::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .returning(PostingDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Posting::from(updated))
            })
            .await
    }
}
