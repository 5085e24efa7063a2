use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::domain::models::booking::{Booking, BookingSeat, NewBookingParams};
use crate::domain::models::event::{Event, EventStatus};
use crate::domain::models::seat::{Seat, SeatHold};
use crate::domain::ports::{BookingRepository, EventRepository, OfferRepository, SeatInventory};
use crate::domain::services::pricing;
use crate::error::AppError;

/// Drives the booking state machine: holds seats, prices the selection,
/// creates the pending booking, and compensates on every failure path so
/// seat state never outlives a failed attempt.
pub struct BookingService {
    event_repo: Arc<dyn EventRepository>,
    inventory: Arc<dyn SeatInventory>,
    offer_repo: Arc<dyn OfferRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    tax_rate: f64,
}

impl BookingService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        inventory: Arc<dyn SeatInventory>,
        offer_repo: Arc<dyn OfferRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        tax_rate: f64,
    ) -> Self {
        Self {
            event_repo,
            inventory,
            offer_repo,
            booking_repo,
            tax_rate,
        }
    }

    pub async fn create_booking(
        &self,
        customer_id: &str,
        event_id: &str,
        seat_ids: &[String],
        offer_code: Option<&str>,
    ) -> Result<Booking, AppError> {
        let event = self
            .event_repo
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;
        if event.status != EventStatus::Published {
            return Err(AppError::EventNotBookable(format!(
                "event {} is {:?}",
                event_id, event.status
            )));
        }
        if event.start_time <= Utc::now() {
            return Err(AppError::EventNotBookable(format!(
                "event {} has already started",
                event_id
            )));
        }

        if seat_ids.is_empty() {
            return Err(AppError::InvalidSeatSelection("no seats selected".to_string()));
        }
        let unique: HashSet<&String> = seat_ids.iter().collect();
        if unique.len() != seat_ids.len() {
            return Err(AppError::InvalidSeatSelection("duplicate seat ids".to_string()));
        }
        let seats = self.inventory.find_by_ids(seat_ids).await?;
        if seats.len() != seat_ids.len() || seats.iter().any(|s| s.event_id != event_id) {
            return Err(AppError::InvalidSeatSelection(
                "one or more seats do not belong to this event".to_string(),
            ));
        }

        let hold = self.inventory.hold(event_id, seat_ids).await?;

        // From here until the booking row exists, every failure must give
        // the hold back before returning.
        match self.create_pending(&event, &seats, &hold, customer_id, offer_code).await {
            Ok(booking) => {
                self.event_repo.sync_sold_out(event_id).await?;
                info!(
                    booking_id = %booking.id,
                    event_id = %event_id,
                    seats = seat_ids.len(),
                    total_cents = booking.total_cents,
                    "Booking created, awaiting payment"
                );
                Ok(booking)
            }
            Err(err) => {
                if let Err(release_err) = self.inventory.release_hold(&hold.reference).await {
                    error!(
                        hold_ref = %hold.reference,
                        "Failed to release hold after booking error: {:?}",
                        release_err
                    );
                }
                Err(err)
            }
        }
    }

    async fn create_pending(
        &self,
        event: &Event,
        seats: &[Seat],
        hold: &SeatHold,
        customer_id: &str,
        offer_code: Option<&str>,
    ) -> Result<Booking, AppError> {
        let subtotal_cents: i64 = seats.iter().map(|s| s.price_cents(event.base_price_cents)).sum();

        let (discount_cents, canonical_code) = match offer_code {
            Some(code) => {
                let code = code.to_uppercase();
                let offer = self
                    .offer_repo
                    .find_by_code(&code)
                    .await?
                    .ok_or(AppError::OfferInvalid)?;
                if !offer.active {
                    return Err(AppError::OfferInvalid);
                }
                if offer.is_expired(Utc::now()) {
                    return Err(AppError::OfferExpired);
                }
                if offer.is_exhausted() {
                    return Err(AppError::OfferExhausted);
                }
                (pricing::discount_cents(&offer, subtotal_cents), Some(offer.code))
            }
            None => (0, None),
        };
        let tax_cents = pricing::tax_cents(subtotal_cents - discount_cents, self.tax_rate);

        let booking = Booking::new(NewBookingParams {
            customer_id: customer_id.to_string(),
            event_id: event.id.clone(),
            hold_ref: hold.reference.clone(),
            subtotal_cents,
            discount_cents,
            tax_cents,
            offer_code: canonical_code.clone(),
        });
        let links: Vec<BookingSeat> = seats
            .iter()
            .map(|s| BookingSeat::new(&booking.id, &s.id, s.price_cents(event.base_price_cents)))
            .collect();

        self.booking_repo
            .create_pending(&booking, &links, canonical_code.as_deref())
            .await
    }

    /// Cancels a booking in any active status, invalidating its tickets and
    /// freeing its seats. Returns false when the booking was already
    /// terminal (the cancel raced with settlement, refund, or a previous
    /// cancel).
    pub async fn cancel_booking(&self, booking_id: &str) -> Result<bool, AppError> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;
        let cancelled = self.booking_repo.cancel_active(booking_id).await?;
        if cancelled {
            self.event_repo.sync_sold_out(&booking.event_id).await?;
            info!(booking_id = %booking_id, "Booking cancelled; seats released");
        }
        Ok(cancelled)
    }

    /// Hold-expiry sweep: cancels pending bookings created before the
    /// cutoff. The cancel is a status CAS, so a settlement racing the sweep
    /// wins or loses cleanly.
    pub async fn expire_stale_holds(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let stale = self.booking_repo.find_expired_pending(cutoff).await?;
        let mut released = 0;
        for booking in stale {
            if self.booking_repo.expire_pending(&booking.id).await? {
                self.event_repo.sync_sold_out(&booking.event_id).await?;
                info!(booking_id = %booking.id, "Expired pending booking; seats released");
                released += 1;
            }
        }
        Ok(released)
    }

    pub async fn find_booking(&self, booking_id: &str) -> Result<Option<Booking>, AppError> {
        self.booking_repo.find_by_id(booking_id).await
    }

    pub async fn list_for_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError> {
        self.booking_repo.list_by_customer(customer_id).await
    }

    pub async fn list_for_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        self.booking_repo.list_by_event(event_id).await
    }
}
