//! Notifications module - read cache, backfill and the subscriber-facing service.

mod backfill;
mod notification_cache;
mod notifications_model;
mod notifications_service;
mod notifications_traits;


pub use backfill::{is_eligible, BackfillSynchronizer};
pub use notification_cache::{
    CacheKeyKind, CachedEntry, MokaNotificationCache, NotificationCache, NotificationCacheKey,
};
pub use notifications_model::{NotificationPolicy, ReconcileOutcome};
pub use notifications_service::NotificationService;
pub use notifications_traits::NotificationServiceTrait;
