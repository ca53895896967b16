//! Notification policy and reconciliation results.

use std::time::Duration as StdDuration;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_LIST_TTL_SECS, DEFAULT_LOOKBACK_DAYS,
    DEFAULT_RECONCILE_COOLDOWN_SECS, DEFAULT_UNREAD_TTL_SECS, MAX_CACHE_TTL_SECS,
    MAX_LOOKBACK_DAYS,
};

/// Tunable windows of the delivery subsystem.
///
/// None of the defaults are load-bearing for correctness; the look-back only
/// has to be bounded, and the TTLs only bound how stale a cached read can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPolicy {
    /// How long before an enrollment's `selected_at` a posting may have been
    /// created and still reach that subscriber through backfill.
    pub lookback: Duration,
    pub list_ttl: StdDuration,
    pub unread_ttl: StdDuration,
    /// Minimum time between two reconciliation passes for one subscriber.
    pub cooldown: StdDuration,
    pub cache_capacity: u64,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            lookback: Duration::days(DEFAULT_LOOKBACK_DAYS),
            list_ttl: StdDuration::from_secs(DEFAULT_LIST_TTL_SECS),
            unread_ttl: StdDuration::from_secs(DEFAULT_UNREAD_TTL_SECS),
            cooldown: StdDuration::from_secs(DEFAULT_RECONCILE_COOLDOWN_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl NotificationPolicy {
    /// Clamped to `0..=MAX_LOOKBACK_DAYS`.
    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback = Duration::days(days.clamp(0, MAX_LOOKBACK_DAYS));
        self
    }

    /// Each window is capped at `MAX_CACHE_TTL_SECS`.
    pub fn with_ttls(mut self, list: StdDuration, unread: StdDuration, cooldown: StdDuration) -> Self {
        let cap = StdDuration::from_secs(MAX_CACHE_TTL_SECS);
        self.list_ttl = list.min(cap);
        self.unread_ttl = unread.min(cap);
        self.cooldown = cooldown.min(cap);
        self
    }
}

/// What a reconciliation pass did.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ReconcileOutcome {
    /// The subscriber was reconciled recently; nothing was checked.
    CoolingDown,
    Reconciled { created: usize },
}
