use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Failure,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Payment {
    pub id: String,
    pub booking_id: String,
    pub amount_cents: i64,
    pub status: PaymentStatus,
    pub method: String,
    pub transaction_ref: String,
    pub settled_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(booking_id: &str, amount_cents: i64, status: PaymentStatus, method: &str) -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id: booking_id.to_string(),
            amount_cents,
            status,
            method: method.to_string(),
            transaction_ref: format!("TXN-{}", hex[..12].to_uppercase()),
            settled_at: Utc::now(),
        }
    }
}
