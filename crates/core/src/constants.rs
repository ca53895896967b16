/// How far before an enrollment's `selected_at` a posting may have been
/// created and still be backfilled to that subscriber.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 3;

/// Longest accepted look-back window.
pub const MAX_LOOKBACK_DAYS: i64 = 3_650;

/// Longest accepted TTL or cooldown for any cache kind.
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// TTL for cached notification lists.
pub const DEFAULT_LIST_TTL_SECS: u64 = 120;

/// TTL for cached unread counts.
pub const DEFAULT_UNREAD_TTL_SECS: u64 = 120;

/// Per-subscriber reconciliation cooldown.
pub const DEFAULT_RECONCILE_COOLDOWN_SECS: u64 = 300;

/// Upper bound on entries held per cache key kind.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Column of the career catalog assumed to hold the display name when the
/// configured one cannot be used.
pub const DEFAULT_CAREER_NAME_COLUMN: &str = "name";
