use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use ticketing_backend::{
    config::Config,
    domain::models::{
        booking::Booking,
        event::{Event, EventStatus, NewEventParams},
        notification::Notification,
        payment::PaymentOutcome,
        seat::Seat,
        ticket::Ticket,
    },
    domain::ports::Notifier,
    error::AppError,
    infra::factory::{build_state, run_migrations},
    state::AppState,
};

/// Records every payload instead of delivering it, so tests can assert the
/// engine fired the right notifications.
#[derive(Default)]
pub struct MockNotifier {
    pub sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub state: Arc<AppState>,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub notifier: Arc<MockNotifier>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_migrations(&pool).await;

        let config = Config {
            database_url: db_url,
            app_name: "ticketing-backend-tests".to_string(),
            currency: "USD".to_string(),
            tax_rate: 0.08,
            hold_ttl_minutes: 15,
            sweep_interval_secs: 60,
        };

        let notifier = Arc::new(MockNotifier::default());
        let state = Arc::new(build_state(&config, pool.clone(), notifier.clone()));

        Self {
            state,
            pool,
            db_filename,
            notifier,
        }
    }

    /// A published event five days out, with its full seat grid.
    pub async fn seed_published_event(&self, row_count: u32, seats_per_row: u32) -> (Event, Vec<Seat>) {
        let event = self
            .state
            .event_service
            .create_event(NewEventParams {
                organizer_id: "organizer-1".to_string(),
                title: "Indie Music Night".to_string(),
                description: "A live showcase with three local indie bands.".to_string(),
                venue: "City Hall Stage".to_string(),
                start_time: Utc::now() + ChronoDuration::days(5),
                end_time: Utc::now() + ChronoDuration::days(5) + ChronoDuration::hours(4),
                base_price_cents: 3_500,
                row_count,
                seats_per_row,
            })
            .await
            .expect("Failed to create event");

        let event = self
            .state
            .event_service
            .update_status(&event.id, EventStatus::Published)
            .await
            .expect("Failed to publish event");

        let seats = self
            .state
            .event_service
            .list_seats(&event.id)
            .await
            .expect("Failed to list seats");
        (event, seats)
    }

    /// Books the given seats for `customer-1` and settles successfully.
    pub async fn confirmed_booking(&self, event: &Event, seat_ids: &[String]) -> (Booking, Vec<Ticket>) {
        let booking = self
            .state
            .booking_service
            .create_booking("customer-1", &event.id, seat_ids, None)
            .await
            .expect("Failed to create booking");
        let (confirmed, _payment) = self
            .state
            .payment_service
            .settle(&booking.id, "card", PaymentOutcome::Success)
            .await
            .expect("Failed to settle booking");
        let tickets = self
            .state
            .ticket_service
            .list_for_booking(&confirmed.id)
            .await
            .expect("Failed to list tickets");
        (confirmed, tickets)
    }

    pub async fn seat_states(&self, seat_ids: &[String]) -> Vec<Seat> {
        self.state
            .seat_inventory
            .find_by_ids(seat_ids)
            .await
            .expect("Failed to fetch seats")
    }
}

pub fn seat_ids(seats: &[Seat], n: usize) -> Vec<String> {
    seats.iter().take(n).map(|s| s.id.clone()).collect()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
