use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use rand::Rng;
use tokio::sync::mpsc;
use uuid::Uuid;

use ticketing_backend::config::Config;
use ticketing_backend::domain::models::event::{EventStatus, NewEventParams};
use ticketing_backend::domain::models::payment::PaymentOutcome;
use ticketing_backend::error::AppError;
use ticketing_backend::infra::factory::bootstrap_state;
use ticketing_backend::state::AppState;

const DURATION_SECS: u64 = 20;
const ROWS: u32 = 26;
const SEATS_PER_ROW: u32 = 40;

#[tokio::main]
async fn main() {
    println!("{}", "🚀 Seat Contention Benchmark".bold().green());

    let db_filename = format!("bench_{}.db", Uuid::new_v4());
    let config = Config {
        database_url: format!("sqlite://{}?mode=rwc", db_filename),
        app_name: "benchmark".to_string(),
        currency: "USD".to_string(),
        tax_rate: 0.08,
        hold_ttl_minutes: 15,
        sweep_interval_secs: 60,
    };

    println!("\n{}", "⚙️  Setting up benchmark data...".yellow());
    let state = Arc::new(bootstrap_state(&config).await);
    let (event_id, seat_ids) = setup_event(&state).await;
    println!("{}", "✅ Data created successfully.".green());
    println!("   Event ID: {}", event_id);
    println!("   Seats:    {}", seat_ids.len());

    let rps_stages = vec![10, 50, 200, 1000];

    println!("\n{}", "=".repeat(72));
    println!("Workload: hold 2 random seats, settle failure to recycle them");
    println!("{}", "=".repeat(72));
    println!(
        "{:<10} | {:<12} | {:<12} | {:<12} | {:<12}",
        "RPS", "Mean (ms)", "P99 (ms)", "Booked", "Contended"
    );
    println!("{:-<10}-+-{:-<12}-+-{:-<12}-+-{:-<12}-+-{:-<12}", "", "", "", "", "");

    for &rps in &rps_stages {
        run_stage(state.clone(), &event_id, Arc::new(seat_ids.clone()), rps).await;
    }

    drop(state);
    let _ = std::fs::remove_file(&db_filename);
    let _ = std::fs::remove_file(format!("{}-wal", db_filename));
    let _ = std::fs::remove_file(format!("{}-shm", db_filename));
}

async fn setup_event(state: &Arc<AppState>) -> (String, Vec<String>) {
    let event = state
        .event_service
        .create_event(NewEventParams {
            organizer_id: "bench-organizer".to_string(),
            title: "Benchmark Arena Night".to_string(),
            description: "Load testing".to_string(),
            venue: "Server".to_string(),
            start_time: Utc::now() + ChronoDuration::days(7),
            end_time: Utc::now() + ChronoDuration::days(7) + ChronoDuration::hours(3),
            base_price_cents: 3_500,
            row_count: ROWS,
            seats_per_row: SEATS_PER_ROW,
        })
        .await
        .expect("Failed to create benchmark event");

    state
        .event_service
        .update_status(&event.id, EventStatus::Published)
        .await
        .expect("Failed to publish benchmark event");

    let seats = state
        .event_service
        .list_seats(&event.id)
        .await
        .expect("Failed to list benchmark seats");
    (event.id, seats.into_iter().map(|s| s.id).collect())
}

async fn run_stage(state: Arc<AppState>, event_id: &str, seat_ids: Arc<Vec<String>>, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).unwrap()),
    ));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let state = state.clone();
            let event_id = event_id.to_string();
            let seat_ids = seat_ids.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let picks = {
                    let mut rng = rand::thread_rng();
                    let first = rng.gen_range(0..seat_ids.len());
                    let second = (first + 1 + rng.gen_range(0..seat_ids.len() - 1)) % seat_ids.len();
                    vec![seat_ids[first].clone(), seat_ids[second].clone()]
                };
                let customer = format!("bench-customer-{}", Uuid::new_v4());

                let req_start = Instant::now();
                let outcome = state
                    .booking_service
                    .create_booking(&customer, &event_id, &picks, None)
                    .await;
                let latency = req_start.elapsed();

                let booked = match outcome {
                    Ok(booking) => {
                        // Recycle the seats so the pool does not drain.
                        let _ = state
                            .payment_service
                            .settle(&booking.id, "benchmark", PaymentOutcome::Failure)
                            .await;
                        true
                    }
                    Err(AppError::SeatsUnavailable(_)) => false,
                    Err(err) => {
                        eprintln!("{} {:?}", "Unexpected benchmark error:".red(), err);
                        false
                    }
                };

                let _ = tx.send((latency, booked)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let mut booked = 0u64;
    let mut contended = 0u64;

    while let Some((latency, success)) = rx.recv().await {
        if success {
            booked += 1;
        } else {
            contended += 1;
        }
        histogram.record(latency.as_micros() as u64).unwrap();
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;

    println!(
        "{:<10} | {:<12.2} | {:<12.2} | {:<12} | {:<12}",
        rps, mean_ms, p99_ms, booked, contended
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}
