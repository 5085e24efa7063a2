use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Event is not open for booking: {0}")]
    EventNotBookable(String),
    #[error("Invalid seat selection: {0}")]
    InvalidSeatSelection(String),
    #[error("Seats unavailable: {0:?}")]
    SeatsUnavailable(Vec<String>),
    #[error("Unknown or inactive offer code")]
    OfferInvalid,
    #[error("Offer has expired")]
    OfferExpired,
    #[error("Offer usage limit reached")]
    OfferExhausted,
    #[error("Booking is not awaiting payment: {0}")]
    BookingNotPayable(String),
    #[error("Booking is not refundable: {0}")]
    BookingNotRefundable(String),
    #[error("Ticket not found")]
    TicketNotFound,
    #[error("Ticket already used")]
    TicketAlreadyUsed(Option<DateTime<Utc>>),
    #[error("Ticket has been invalidated")]
    TicketInvalidated,
    #[error("Unknown hold reference: {0}")]
    HoldNotFound(String),
    #[error("Concurrent update conflict: {0}")]
    ConcurrentConflict(String),
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),
}
