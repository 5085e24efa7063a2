use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::models::booking::{Booking, BookingStatus};
use crate::domain::models::notification::Notification;
use crate::domain::models::payment::{Payment, PaymentOutcome, PaymentStatus};
use crate::domain::models::ticket::Ticket;
use crate::domain::ports::{BookingRepository, EventRepository, Notifier, SeatInventory};
use crate::error::AppError;

/// Resolves a pending booking against a (simulated) payment outcome.
/// Settlement is terminal: there is no automatic retry, and a second call
/// on a resolved booking fails with `BookingNotPayable`.
pub struct PaymentService {
    booking_repo: Arc<dyn BookingRepository>,
    event_repo: Arc<dyn EventRepository>,
    inventory: Arc<dyn SeatInventory>,
    notifier: Arc<dyn Notifier>,
}

impl PaymentService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        event_repo: Arc<dyn EventRepository>,
        inventory: Arc<dyn SeatInventory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            booking_repo,
            event_repo,
            inventory,
            notifier,
        }
    }

    pub async fn settle(
        &self,
        booking_id: &str,
        method: &str,
        outcome: PaymentOutcome,
    ) -> Result<(Booking, Payment), AppError> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;
        if booking.status != BookingStatus::PendingPayment {
            return Err(AppError::BookingNotPayable(format!(
                "booking {} is {:?}",
                booking_id, booking.status
            )));
        }

        match outcome {
            PaymentOutcome::Success => self.settle_success(booking, method).await,
            PaymentOutcome::Failure => self.settle_failure(booking, method).await,
        }
    }

    async fn settle_success(&self, booking: Booking, method: &str) -> Result<(Booking, Payment), AppError> {
        let links = self.booking_repo.list_links(&booking.id).await?;
        let tickets: Vec<Ticket> = links.iter().map(|link| Ticket::new(&link.id)).collect();
        let payment = Payment::new(&booking.id, booking.total_cents, PaymentStatus::Paid, method);

        // The status CAS inside this transaction is what makes settlement
        // exactly-once; a racing second settle gets BookingNotPayable.
        self.booking_repo
            .record_settlement(&booking.id, &payment, &tickets)
            .await?;

        match booking.hold_ref.as_deref() {
            Some(hold_ref) => self.inventory.confirm(hold_ref).await?,
            None => warn!(booking_id = %booking.id, "Confirmed booking had no hold reference"),
        }

        let confirmed = self
            .booking_repo
            .find_by_id(&booking.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking.id)))?;
        info!(
            booking_id = %booking.id,
            transaction_ref = %payment.transaction_ref,
            tickets = tickets.len(),
            "Payment settled; tickets issued"
        );

        self.dispatch(Notification::BookingConfirmed {
            booking_id: confirmed.id.clone(),
            customer_id: confirmed.customer_id.clone(),
            event_id: confirmed.event_id.clone(),
            total_cents: confirmed.total_cents,
            ticket_codes: tickets.iter().map(|t| t.qr_code.clone()).collect(),
        })
        .await;

        Ok((confirmed, payment))
    }

    async fn settle_failure(&self, booking: Booking, method: &str) -> Result<(Booking, Payment), AppError> {
        let payment = Payment::new(&booking.id, booking.total_cents, PaymentStatus::Failed, method);
        self.booking_repo
            .record_failed_settlement(&booking.id, &payment)
            .await?;

        if let Some(hold_ref) = booking.hold_ref.as_deref() {
            self.inventory.release_hold(hold_ref).await?;
        }
        self.event_repo.sync_sold_out(&booking.event_id).await?;

        let cancelled = self
            .booking_repo
            .find_by_id(&booking.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking.id)))?;
        info!(
            booking_id = %booking.id,
            transaction_ref = %payment.transaction_ref,
            "Payment failed; booking cancelled and seats released"
        );
        Ok((cancelled, payment))
    }

    async fn dispatch(&self, notification: Notification) {
        if let Err(err) = self.notifier.notify(&notification).await {
            warn!("Notification delivery failed: {:?}", err);
        }
    }
}
