use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info};

use crate::state::AppState;

/// Hold-expiry sweeper: a booking left in pending_payment longer than the
/// configured TTL is cancelled and its seats go back to inventory. The
/// cancel is a status compare-and-swap, so a settlement racing the sweep
/// resolves cleanly either way.
pub async fn start_hold_expiry_worker(state: Arc<AppState>) {
    info!(
        ttl_minutes = state.config.hold_ttl_minutes,
        interval_secs = state.config.sweep_interval_secs,
        "Starting hold expiry worker..."
    );

    loop {
        let cutoff = Utc::now() - chrono::Duration::minutes(state.config.hold_ttl_minutes);
        match state.booking_service.expire_stale_holds(cutoff).await {
            Ok(0) => {}
            Ok(released) => info!("Hold expiry sweep released {} stale bookings", released),
            Err(err) => error!("Hold expiry sweep failed: {:?}", err),
        }
        sleep(Duration::from_secs(state.config.sweep_interval_secs)).await;
    }
}
