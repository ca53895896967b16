use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::errors::Result;
use crate::postings::postings_model::{
    NewPosting, Posting, PostingUpdate, PublishOutcome, Publisher,
};

/// Trait for posting repository operations
#[async_trait]
pub trait PostingRepositoryTrait: Send + Sync {
    fn get_posting(&self, posting_id: &str) -> Result<Option<Posting>>;

    fn list_postings_by_publisher(&self, publisher_id: &str) -> Result<Vec<Posting>>;

    /// Active postings created at or after `since`; every active posting when
    /// `since` is `None`.
    fn list_active_postings_since(&self, since: Option<NaiveDateTime>) -> Result<Vec<Posting>>;

    /// Inserts the posting and one delivery per subscriber in a single
    /// transaction. Deliveries that already exist are skipped; any other
    /// failure rolls back the posting as well.
    async fn create_posting_with_deliveries(
        &self,
        publisher_id: &str,
        new_posting: NewPosting,
        subscriber_ids: Vec<String>,
    ) -> Result<PublishOutcome>;

    async fn update_posting(&self, posting_id: &str, update: PostingUpdate) -> Result<Posting>;

    async fn set_posting_active(&self, posting_id: &str, is_active: bool) -> Result<Posting>;
}

/// Read access to the company directory.
pub trait PublisherDirectoryTrait: Send + Sync {
    fn get_publisher(&self, publisher_id: &str) -> Result<Option<Publisher>>;

    fn is_approved(&self, publisher_id: &str) -> Result<bool> {
        Ok(self
            .get_publisher(publisher_id)?
            .is_some_and(|publisher| publisher.is_approved))
    }
}

/// Trait for posting service operations
#[async_trait]
pub trait PostingServiceTrait: Send + Sync {
    async fn publish(&self, publisher_id: &str, new_posting: NewPosting) -> Result<Posting>;

    async fn update_posting(
        &self,
        publisher_id: &str,
        posting_id: &str,
        update: PostingUpdate,
    ) -> Result<Posting>;

    async fn deactivate_posting(&self, publisher_id: &str, posting_id: &str) -> Result<Posting>;

    fn get_posting(&self, posting_id: &str) -> Result<Option<Posting>>;

    fn list_publisher_postings(&self, publisher_id: &str) -> Result<Vec<Posting>>;
}
