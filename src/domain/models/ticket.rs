use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Issued,
    Used,
    Invalidated,
}

/// Single-use entry pass, bound one-to-one to a booking-seat link.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Ticket {
    pub id: String,
    pub booking_seat_id: String,
    pub qr_code: String,
    pub status: TicketStatus,
    pub validated_at: Option<DateTime<Utc>>,
    pub validated_by: Option<String>,
}

impl Ticket {
    pub fn new(booking_seat_id: &str) -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self {
            id: Uuid::new_v4().to_string(),
            booking_seat_id: booking_seat_id.to_string(),
            qr_code: format!("TKT-{}", hex[..16].to_uppercase()),
            status: TicketStatus::Issued,
            validated_at: None,
            validated_by: None,
        }
    }
}

/// What the gate operator sees after a successful validation.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct GateReceipt {
    pub ticket_id: String,
    pub qr_code: String,
    pub event_id: String,
    pub event_title: String,
    pub row_label: String,
    pub seat_number: i64,
    pub validated_at: DateTime<Utc>,
}
