use crate::domain::models::{
    booking::{Booking, BookingSeat},
    event::{Event, EventStatus, EventWithInventory},
    notification::Notification,
    offer::Offer,
    payment::Payment,
    refund::Refund,
    seat::{Seat, SeatHold},
    support::{SupportStatus, SupportTicket},
    ticket::{GateReceipt, Ticket},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Authoritative store and atomic-transition authority for seat
/// availability. The sole writer of seat state.
#[async_trait]
pub trait SeatInventory: Send + Sync {
    /// Bulk onboarding entry point; seats start `available`.
    async fn bulk_create(&self, seats: &[Seat]) -> Result<(), AppError>;
    /// All-or-nothing transition of every requested seat from `available`
    /// to `held`. On failure no state changes and the conflicting seat ids
    /// are reported via `SeatsUnavailable`.
    async fn hold(&self, event_id: &str, seat_ids: &[String]) -> Result<SeatHold, AppError>;
    /// Held -> booked for every seat under the reference. An unknown
    /// reference is a logic error, not a retryable condition.
    async fn confirm(&self, hold_ref: &str) -> Result<(), AppError>;
    /// Back to `available`. Idempotent: a reference with no held seats
    /// left is a no-op.
    async fn release_hold(&self, hold_ref: &str) -> Result<(), AppError>;
    async fn release_seats(&self, seat_ids: &[String]) -> Result<(), AppError>;
    async fn find_by_ids(&self, seat_ids: &[String]) -> Result<Vec<Seat>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Seat>, AppError>;
    async fn count_available(&self, event_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list_with_inventory(&self) -> Result<Vec<EventWithInventory>, AppError>;
    /// Conditional status flip; returns false when the event was not in
    /// `from` anymore.
    async fn set_status(&self, event_id: &str, from: EventStatus, to: EventStatus) -> Result<bool, AppError>;
    /// Re-derives the sold_out <-> published flip from current seat
    /// availability.
    async fn sync_sold_out(&self, event_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn create(&self, offer: &Offer) -> Result<Offer, AppError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Offer>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking and its seat links; when an offer code is given
    /// its usage counter is incremented in the same transaction, failing
    /// with `OfferExhausted` if the cap has been reached meanwhile.
    async fn create_pending(&self, booking: &Booking, links: &[BookingSeat], offer_code: Option<&str>) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_links(&self, booking_id: &str) -> Result<Vec<BookingSeat>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn find_active_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn find_expired_pending(&self, cutoff: DateTime<Utc>) -> Result<Vec<Booking>, AppError>;
    /// pending_payment -> confirmed plus the payment and ticket rows, one
    /// transaction. `BookingNotPayable` if the booking is not pending
    /// anymore (covers double settlement).
    async fn record_settlement(&self, booking_id: &str, payment: &Payment, tickets: &[Ticket]) -> Result<(), AppError>;
    /// pending_payment -> cancelled plus the failed payment row.
    async fn record_failed_settlement(&self, booking_id: &str, payment: &Payment) -> Result<(), AppError>;
    /// Any active status -> cancelled, invalidating issued tickets and
    /// releasing the booking's seats in one transaction. Returns false if
    /// the booking was already terminal.
    async fn cancel_active(&self, booking_id: &str) -> Result<bool, AppError>;
    /// Same cancel transaction, but only from pending_payment. The
    /// hold-expiry sweep uses this so a booking that settled after the
    /// sweep's query is left alone.
    async fn expire_pending(&self, booking_id: &str) -> Result<bool, AppError>;
    async fn find_payment(&self, booking_id: &str) -> Result<Option<Payment>, AppError>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_by_code(&self, qr_code: &str) -> Result<Option<Ticket>, AppError>;
    /// issued -> used compare-and-swap; false means the race was lost.
    async fn mark_used(&self, ticket_id: &str, validated_by: &str, at: DateTime<Utc>) -> Result<bool, AppError>;
    async fn list_by_booking(&self, booking_id: &str) -> Result<Vec<Ticket>, AppError>;
    async fn booking_for_ticket(&self, ticket_id: &str) -> Result<Option<Booking>, AppError>;
    async fn gate_receipt(&self, ticket_id: &str) -> Result<GateReceipt, AppError>;
}

#[async_trait]
pub trait RefundRepository: Send + Sync {
    /// Moves the booking confirmed -> refund_requested and inserts the
    /// refund row in one transaction.
    async fn create_requested(&self, refund: &Refund) -> Result<Refund, AppError>;
    async fn find_by_booking(&self, booking_id: &str) -> Result<Option<Refund>, AppError>;
    /// Refund completed, booking refunded, tickets invalidated, seats
    /// released, payment refunded, all in one transaction.
    async fn approve(&self, booking_id: &str, resolved_by: &str, at: DateTime<Utc>) -> Result<Refund, AppError>;
    /// Refund rejected, booking back to confirmed; no seat or ticket change.
    async fn reject(&self, booking_id: &str, resolved_by: &str, at: DateTime<Utc>) -> Result<Refund, AppError>;
}

#[async_trait]
pub trait SupportTicketRepository: Send + Sync {
    async fn create(&self, ticket: &SupportTicket) -> Result<SupportTicket, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<SupportTicket>, AppError>;
    async fn update(&self, ticket: &SupportTicket) -> Result<SupportTicket, AppError>;
    async fn list_by_status(&self, status: SupportStatus) -> Result<Vec<SupportTicket>, AppError>;
}

/// Notification-collaborator boundary. Invoked fire-and-forget; the engine
/// logs delivery failures and never propagates them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), AppError>;
}
