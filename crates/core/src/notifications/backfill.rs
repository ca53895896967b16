//! Read-triggered reconciliation of deliveries for late enrollments.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use log::{debug, info};

use crate::deliveries::{DeliveryRepositoryTrait, NewDelivery};
use crate::enrollment::{EnrollmentResolver, ResolvedEnrollment};
use crate::errors::Result;
use crate::notifications::notification_cache::{
    CachedEntry, NotificationCache, NotificationCacheKey,
};
use crate::notifications::notifications_model::ReconcileOutcome;
use crate::postings::{Posting, PostingRepositoryTrait};

/// Whether `posting` should be delivered to the holder of `enrollment`.
///
/// Enrollments without `selected_at` (profile fallback) have no look-back
/// bound.
pub fn is_eligible(enrollment: &ResolvedEnrollment, posting: &Posting, lookback: Duration) -> bool {
    if !posting.is_active || !enrollment.intersects(&posting.target_career_ids) {
        return false;
    }
    match enrollment.enrollment.selected_at {
        None => true,
        Some(selected_at) => match selected_at.checked_sub_signed(lookback) {
            Some(earliest) => posting.created_at >= earliest,
            None => true,
        },
    }
}

/// Oldest posting creation time any of `enrollments` can still reach.
fn earliest_reachable(
    enrollments: &[ResolvedEnrollment],
    lookback: Duration,
) -> Option<NaiveDateTime> {
    let mut earliest: Option<NaiveDateTime> = None;
    for resolved in enrollments {
        let bound = resolved
            .enrollment
            .selected_at
            .and_then(|selected_at| selected_at.checked_sub_signed(lookback))?;
        earliest = Some(earliest.map_or(bound, |current| current.min(bound)));
    }
    earliest
}

/// Creates deliveries a subscriber became eligible for after publication.
///
/// Bounded by the look-back window and by a per-subscriber cooldown stored in
/// the notification cache.
pub struct BackfillSynchronizer {
    resolver: Arc<EnrollmentResolver>,
    posting_repository: Arc<dyn PostingRepositoryTrait>,
    delivery_repository: Arc<dyn DeliveryRepositoryTrait>,
    cache: Arc<dyn NotificationCache>,
    lookback: Duration,
}

impl BackfillSynchronizer {
    pub fn new(
        resolver: Arc<EnrollmentResolver>,
        posting_repository: Arc<dyn PostingRepositoryTrait>,
        delivery_repository: Arc<dyn DeliveryRepositoryTrait>,
        cache: Arc<dyn NotificationCache>,
        lookback: Duration,
    ) -> Self {
        BackfillSynchronizer {
            resolver,
            posting_repository,
            delivery_repository,
            cache,
            lookback,
        }
    }

    pub async fn reconcile(&self, subscriber_id: &str) -> Result<ReconcileOutcome> {
        let cooldown_key = NotificationCacheKey::Cooldown(subscriber_id.to_string());
        if self.cache.get(&cooldown_key).await?.is_some() {
            debug!("Skipping reconciliation for {}: cooling down", subscriber_id);
            return Ok(ReconcileOutcome::CoolingDown);
        }

        let created = self.create_missing_deliveries(subscriber_id).await?;
        if created > 0 {
            info!(
                "Backfilled {} delivery record(s) for subscriber {}",
                created, subscriber_id
            );
            self.cache.invalidate_reads(subscriber_id).await?;
        }

        self.cache.put(cooldown_key, CachedEntry::Cooldown).await?;
        Ok(ReconcileOutcome::Reconciled { created })
    }

    async fn create_missing_deliveries(&self, subscriber_id: &str) -> Result<usize> {
        let enrollments = self.resolver.resolve_for_subscriber(subscriber_id).await?;
        if enrollments.is_empty() {
            return Ok(0);
        }

        let since = earliest_reachable(&enrollments, self.lookback);
        let candidates = self.posting_repository.list_active_postings_since(since)?;
        let delivered = self
            .delivery_repository
            .delivered_posting_ids(subscriber_id)?;

        // The pre-filter only saves writes; the insert still ignores conflicts.
        let missing: Vec<NewDelivery> = candidates
            .iter()
            .filter(|posting| !delivered.contains(&posting.id))
            .filter(|posting| {
                enrollments
                    .iter()
                    .any(|enrollment| is_eligible(enrollment, posting, self.lookback))
            })
            .map(|posting| NewDelivery::new(subscriber_id, posting.id.clone()))
            .collect();

        if missing.is_empty() {
            return Ok(0);
        }
        self.delivery_repository
            .insert_deliveries_ignore_conflicts(missing)
            .await
    }
}
