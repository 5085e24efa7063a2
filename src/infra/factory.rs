use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::Config;
use crate::domain::ports::Notifier;
use crate::domain::services::booking_service::BookingService;
use crate::domain::services::event_service::EventService;
use crate::domain::services::payment_service::PaymentService;
use crate::domain::services::refund_service::RefundService;
use crate::domain::services::support_service::SupportService;
use crate::domain::services::ticket_service::TicketService;
use crate::infra::notify::log_notifier::LogNotifier;
use crate::infra::repositories::{
    sqlite_booking_repo::SqliteBookingRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_offer_repo::SqliteOfferRepo, sqlite_refund_repo::SqliteRefundRepo,
    sqlite_seat_repo::SqliteSeatRepo, sqlite_support_repo::SqliteSupportRepo,
    sqlite_ticket_repo::SqliteTicketRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_migrations(&pool).await;

    build_state(config, pool, Arc::new(LogNotifier))
}

pub async fn run_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}

/// Wires repositories and services over an existing pool. Tests use this
/// directly with their own notifier.
pub fn build_state(config: &Config, pool: SqlitePool, notifier: Arc<dyn Notifier>) -> AppState {
    let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
    let seat_inventory = Arc::new(SqliteSeatRepo::new(pool.clone()));
    let offer_repo = Arc::new(SqliteOfferRepo::new(pool.clone()));
    let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
    let ticket_repo = Arc::new(SqliteTicketRepo::new(pool.clone()));
    let refund_repo = Arc::new(SqliteRefundRepo::new(pool.clone()));
    let support_repo = Arc::new(SqliteSupportRepo::new(pool));

    let event_service = Arc::new(EventService::new(
        event_repo.clone(),
        seat_inventory.clone(),
        booking_repo.clone(),
        notifier.clone(),
    ));
    let booking_service = Arc::new(BookingService::new(
        event_repo.clone(),
        seat_inventory.clone(),
        offer_repo.clone(),
        booking_repo.clone(),
        config.tax_rate,
    ));
    let payment_service = Arc::new(PaymentService::new(
        booking_repo.clone(),
        event_repo.clone(),
        seat_inventory.clone(),
        notifier.clone(),
    ));
    let ticket_service = Arc::new(TicketService::new(ticket_repo.clone(), event_repo.clone()));
    let refund_service = Arc::new(RefundService::new(
        booking_repo.clone(),
        refund_repo.clone(),
        event_repo.clone(),
        notifier.clone(),
    ));
    let support_service = Arc::new(SupportService::new(
        support_repo.clone(),
        booking_repo.clone(),
        event_repo.clone(),
    ));

    AppState {
        config: config.clone(),
        event_repo,
        seat_inventory,
        offer_repo,
        booking_repo,
        ticket_repo,
        refund_repo,
        support_repo,
        notifier,
        event_service,
        booking_service,
        payment_service,
        ticket_service,
        refund_service,
        support_service,
    }
}
