use std::{fmt::Display, net::SocketAddr, ops::RangeInclusive, str::FromStr, time::Duration};

use careerpath_core::constants::{
    DEFAULT_LIST_TTL_SECS, DEFAULT_LOOKBACK_DAYS, DEFAULT_RECONCILE_COOLDOWN_SECS,
    DEFAULT_UNREAD_TTL_SECS, MAX_CACHE_TTL_SECS, MAX_LOOKBACK_DAYS,
};
use careerpath_core::notifications::NotificationPolicy;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub lookback_days: i64,
    pub list_ttl: Duration,
    pub unread_ttl: Duration,
    pub cooldown: Duration,
    /// Display-name column of the career catalog, when it is not `name`.
    pub career_name_column: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr = parsed_var("CP_LISTEN_ADDR").unwrap_or_else(|| {
            SocketAddr::from_str(DEFAULT_LISTEN_ADDR)
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080)))
        });
        let db_path = std::env::var("CP_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = std::env::var("CP_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 =
            parsed_var("CP_REQUEST_TIMEOUT_MS").unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);

        let lookback_days =
            bounded_var("CP_LOOKBACK_DAYS", DEFAULT_LOOKBACK_DAYS, 0..=MAX_LOOKBACK_DAYS);
        let ttl_range = 0..=MAX_CACHE_TTL_SECS;
        let list_ttl = bounded_var("CP_LIST_TTL_SECS", DEFAULT_LIST_TTL_SECS, ttl_range.clone());
        let unread_ttl =
            bounded_var("CP_UNREAD_TTL_SECS", DEFAULT_UNREAD_TTL_SECS, ttl_range.clone());
        let cooldown =
            bounded_var("CP_COOLDOWN_SECS", DEFAULT_RECONCILE_COOLDOWN_SECS, ttl_range);
        let career_name_column = std::env::var("CP_CAREER_NAME_COLUMN")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            lookback_days,
            list_ttl: Duration::from_secs(list_ttl),
            unread_ttl: Duration::from_secs(unread_ttl),
            cooldown: Duration::from_secs(cooldown),
            career_name_column,
        }
    }

    pub fn policy(&self) -> NotificationPolicy {
        NotificationPolicy::default()
            .with_lookback_days(self.lookback_days)
            .with_ttls(self.list_ttl, self.unread_ttl, self.cooldown)
    }
}

/// Reads and parses `name`. Unset yields `None`; a malformed value is
/// reported and also yields `None` so the caller's default applies.
fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring malformed {}={:?}, using the default", name, raw);
            None
        }
    }
}

/// Like [`parsed_var`], but a value outside `range` is reported and replaced
/// by `default`.
fn bounded_var<T>(name: &str, default: T, range: RangeInclusive<T>) -> T
where
    T: FromStr + PartialOrd + Display + Copy,
{
    match parsed_var::<T>(name) {
        Some(value) if range.contains(&value) => value,
        Some(value) => {
            tracing::warn!(
                "{}={} is outside {}..={}, using {}",
                name,
                value,
                range.start(),
                range.end(),
                default
            );
            default
        }
        None => default,
    }
}
