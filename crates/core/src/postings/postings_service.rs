use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::{info, warn};

use crate::deliveries::DeliveryRepositoryTrait;
use crate::enrollment::EnrollmentResolver;
use crate::errors::{Error, Result};
use crate::notifications::NotificationCache;
use crate::postings::postings_model::{NewPosting, Posting, PostingUpdate};
use crate::postings::postings_traits::{
    PostingRepositoryTrait, PostingServiceTrait, PublisherDirectoryTrait,
};

/// Publishes postings and fans them out to every enrolled subscriber.
pub struct PostingService {
    posting_repository: Arc<dyn PostingRepositoryTrait>,
    delivery_repository: Arc<dyn DeliveryRepositoryTrait>,
    publisher_directory: Arc<dyn PublisherDirectoryTrait>,
    resolver: Arc<EnrollmentResolver>,
    cache: Arc<dyn NotificationCache>,
}

impl PostingService {
    pub fn new(
        posting_repository: Arc<dyn PostingRepositoryTrait>,
        delivery_repository: Arc<dyn DeliveryRepositoryTrait>,
        publisher_directory: Arc<dyn PublisherDirectoryTrait>,
        resolver: Arc<EnrollmentResolver>,
        cache: Arc<dyn NotificationCache>,
    ) -> Self {
        PostingService {
            posting_repository,
            delivery_repository,
            publisher_directory,
            resolver,
            cache,
        }
    }

    /// Loads a posting and checks that `publisher_id` owns it.
    fn owned_posting(&self, publisher_id: &str, posting_id: &str) -> Result<Posting> {
        let posting = self
            .posting_repository
            .get_posting(posting_id)?
            .ok_or_else(|| Error::NotFound(format!("posting {}", posting_id)))?;
        if posting.publisher_id != publisher_id {
            return Err(Error::Unauthorized(format!(
                "posting {} is not owned by {}",
                posting_id, publisher_id
            )));
        }
        Ok(posting)
    }

    /// New deliveries make cached reads stale. The posting is already
    /// committed, so a failing cache only costs staleness up to the TTL.
    async fn invalidate_recipients(&self, subscriber_ids: &[String]) {
        let results = join_all(
            subscriber_ids
                .iter()
                .map(|subscriber_id| self.cache.invalidate_reads(subscriber_id)),
        )
        .await;
        for (subscriber_id, result) in subscriber_ids.iter().zip(results) {
            if let Err(e) = result {
                warn!(
                    "Failed to invalidate cached notifications for {}: {}",
                    subscriber_id, e
                );
            }
        }
    }

    /// Drops cached reads of everyone holding a delivery of `posting_id`.
    async fn invalidate_posting_recipients(&self, posting_id: &str) {
        match self.delivery_repository.subscriber_ids_for_posting(posting_id) {
            Ok(subscriber_ids) => self.invalidate_recipients(&subscriber_ids).await,
            Err(e) => warn!(
                "Failed to look up recipients of posting {}, cached reads stay until expiry: {}",
                posting_id, e
            ),
        }
    }
}

#[async_trait]
impl PostingServiceTrait for PostingService {
    /// Recipients are resolved just before the write transaction; anyone
    /// enrolling in between is picked up by backfill on their next read.
    async fn publish(&self, publisher_id: &str, new_posting: NewPosting) -> Result<Posting> {
        if !self.publisher_directory.is_approved(publisher_id)? {
            return Err(Error::PublisherNotApproved(publisher_id.to_string()));
        }
        let new_posting = new_posting.validated()?;

        let subscribers = self
            .resolver
            .subscribers_for_careers(&new_posting.target_career_ids)
            .await?;

        let outcome = self
            .posting_repository
            .create_posting_with_deliveries(publisher_id, new_posting, subscribers.clone())
            .await?;

        info!(
            "Published posting {} for {}: {} matched subscriber(s), {} new deliveries",
            outcome.posting.id,
            publisher_id,
            subscribers.len(),
            outcome.deliveries_created
        );

        self.invalidate_recipients(&subscribers).await;
        Ok(outcome.posting)
    }

    async fn update_posting(
        &self,
        publisher_id: &str,
        posting_id: &str,
        update: PostingUpdate,
    ) -> Result<Posting> {
        let update = update.validated()?;
        let posting = self.owned_posting(publisher_id, posting_id)?;
        if update.is_empty() {
            return Ok(posting);
        }
        let changes_display = update.changes_notification_display();
        let posting = self
            .posting_repository
            .update_posting(posting_id, update)
            .await?;
        if changes_display && posting.is_active {
            self.invalidate_posting_recipients(posting_id).await;
        }
        Ok(posting)
    }

    async fn deactivate_posting(&self, publisher_id: &str, posting_id: &str) -> Result<Posting> {
        let posting = self.owned_posting(publisher_id, posting_id)?;
        if !posting.is_active {
            return Ok(posting);
        }
        let posting = self
            .posting_repository
            .set_posting_active(posting_id, false)
            .await?;
        info!("Deactivated posting {} for {}", posting_id, publisher_id);
        self.invalidate_posting_recipients(posting_id).await;
        Ok(posting)
    }

    fn get_posting(&self, posting_id: &str) -> Result<Option<Posting>> {
        self.posting_repository.get_posting(posting_id)
    }

    fn list_publisher_postings(&self, publisher_id: &str) -> Result<Vec<Posting>> {
        self.posting_repository
            .list_postings_by_publisher(publisher_id)
    }
}
