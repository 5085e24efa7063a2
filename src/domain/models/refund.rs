use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    Requested,
    Completed,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Refund {
    pub id: String,
    pub booking_id: String,
    pub status: RefundStatus,
    pub reason: String,
    pub amount_cents: i64,
    pub requested_by: String,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Refund {
    pub fn new(booking_id: &str, reason: &str, amount_cents: i64, requested_by: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id: booking_id.to_string(),
            status: RefundStatus::Requested,
            reason: reason.to_string(),
            amount_cents,
            requested_by: requested_by.to_string(),
            resolved_by: None,
            resolved_at: None,
            created_at: Utc::now(),
        }
    }
}
