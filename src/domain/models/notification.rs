use serde::Serialize;

use crate::domain::models::event::EventStatus;

/// Structured payloads handed to the notification collaborator. Delivery
/// and formatting are its problem; the engine only supplies the data.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    BookingConfirmed {
        booking_id: String,
        customer_id: String,
        event_id: String,
        total_cents: i64,
        ticket_codes: Vec<String>,
    },
    RefundDecided {
        booking_id: String,
        customer_id: String,
        refund_id: String,
        approved: bool,
        amount_cents: i64,
    },
    EventStatusChanged {
        event_id: String,
        old_status: EventStatus,
        new_status: EventStatus,
    },
}
