use std::sync::Arc;

use crate::config::Config;
use careerpath_core::{
    enrollment::{EnrollmentProvider, EnrollmentResolver},
    notifications::{
        MokaNotificationCache, NotificationCache, NotificationService, NotificationServiceTrait,
    },
    postings::{PostingService, PostingServiceTrait},
};
use careerpath_storage_sqlite::{
    careers::{CareerCatalogRepository, CatalogSchema},
    db,
    deliveries::DeliveryRepository,
    directory::{ApplicationTrackerRepository, CompanyDirectoryRepository},
    enrollment::{ActiveSelectionProvider, ProfileCareerProvider},
    postings::PostingRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub posting_service: Arc<dyn PostingServiceTrait>,
    pub notification_service: Arc<dyn NotificationServiceTrait>,
}

/// Installs the global subscriber. `CP_LOG_FORMAT=json` switches to JSON
/// lines; `log` records from the library crates are forwarded as well.
pub fn init_tracing() {
    let log_format = std::env::var("CP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let schema = CatalogSchema::resolve(&pool, config.career_name_column.as_deref())?;
    let catalog = Arc::new(CareerCatalogRepository::new(pool.clone(), schema));
    let providers: Vec<Arc<dyn EnrollmentProvider>> = vec![
        Arc::new(ActiveSelectionProvider::new(pool.clone())),
        Arc::new(ProfileCareerProvider::new(pool.clone())),
    ];
    let resolver = Arc::new(EnrollmentResolver::new(providers, catalog));

    let policy = config.policy();
    let cache: Arc<dyn NotificationCache> = Arc::new(MokaNotificationCache::new(&policy));

    let posting_repository = Arc::new(PostingRepository::new(pool.clone(), writer.clone()));
    let delivery_repository = Arc::new(DeliveryRepository::new(pool.clone(), writer.clone()));
    let publisher_directory = Arc::new(CompanyDirectoryRepository::new(pool.clone()));
    let application_tracker = Arc::new(ApplicationTrackerRepository::new(pool.clone()));

    let posting_service = Arc::new(PostingService::new(
        posting_repository.clone(),
        delivery_repository.clone(),
        publisher_directory,
        resolver.clone(),
        cache.clone(),
    ));
    let notification_service = Arc::new(NotificationService::new(
        resolver,
        posting_repository,
        delivery_repository,
        application_tracker,
        cache,
        &policy,
    ));
    tracing::info!(
        "Notification policy: look-back {} days, cooldown {}s",
        policy.lookback.num_days(),
        policy.cooldown.as_secs()
    );

    Ok(Arc::new(AppState {
        posting_service,
        notification_service,
    }))
}
