use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SupportStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl SupportStatus {
    pub fn can_transition(self, next: SupportStatus) -> bool {
        use SupportStatus::*;
        matches!(
            (self, next),
            (Open, InProgress) | (InProgress, Resolved) | (InProgress, Closed)
        )
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SupportTicket {
    pub id: String,
    pub customer_id: String,
    pub booking_id: Option<String>,
    pub event_id: Option<String>,
    pub subject: String,
    pub description: String,
    pub status: SupportStatus,
    pub assigned_to: Option<String>,
    pub resolution: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewComplaintParams {
    pub customer_id: String,
    pub booking_id: Option<String>,
    pub event_id: Option<String>,
    pub subject: String,
    pub description: String,
}

impl SupportTicket {
    pub fn new(params: NewComplaintParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: params.customer_id,
            booking_id: params.booking_id,
            event_id: params.event_id,
            subject: params.subject,
            description: params.description,
            status: SupportStatus::Open,
            assigned_to: None,
            resolution: None,
            created_at: now,
            updated_at: now,
        }
    }
}
