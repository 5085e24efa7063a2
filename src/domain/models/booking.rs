use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    PendingPayment,
    Confirmed,
    RefundRequested,
    Refunded,
    Cancelled,
}

impl BookingStatus {
    /// A booking in an active status is still entitled to its seats.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            BookingStatus::PendingPayment | BookingStatus::Confirmed | BookingStatus::RefundRequested
        )
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub customer_id: String,
    pub event_id: String,
    pub status: BookingStatus,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub offer_code: Option<String>,
    pub hold_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub customer_id: String,
    pub event_id: String,
    pub hold_ref: String,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub offer_code: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let now = Utc::now();
        let total_cents = params.subtotal_cents - params.discount_cents + params.tax_cents;
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: params.customer_id,
            event_id: params.event_id,
            status: BookingStatus::PendingPayment,
            subtotal_cents: params.subtotal_cents,
            discount_cents: params.discount_cents,
            tax_cents: params.tax_cents,
            total_cents,
            offer_code: params.offer_code,
            hold_ref: Some(params.hold_ref),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Join record: one seat's membership in one booking. The only place the
/// booking-seat relationship is recorded.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingSeat {
    pub id: String,
    pub booking_id: String,
    pub seat_id: String,
    pub ticket_price_cents: i64,
}

impl BookingSeat {
    pub fn new(booking_id: &str, seat_id: &str, ticket_price_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id: booking_id.to_string(),
            seat_id: seat_id.to_string(),
            ticket_price_cents,
        }
    }
}
