use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Published,
    SoldOut,
    Cancelled,
    Completed,
}

impl EventStatus {
    /// Transition table for organizer/admin status changes. `sold_out` is
    /// additionally flipped automatically from seat availability.
    pub fn can_transition(self, next: EventStatus) -> bool {
        use EventStatus::*;
        matches!(
            (self, next),
            (Draft, Published)
                | (Draft, Cancelled)
                | (Published, SoldOut)
                | (Published, Cancelled)
                | (Published, Completed)
                | (SoldOut, Published)
                | (SoldOut, Cancelled)
                | (SoldOut, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, EventStatus::Cancelled | EventStatus::Completed)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub organizer_id: String,
    pub title: String,
    pub description: String,
    pub venue: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub base_price_cents: i64,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub organizer_id: String,
    pub title: String,
    pub description: String,
    pub venue: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub base_price_cents: i64,
    pub row_count: u32,
    pub seats_per_row: u32,
}

impl Event {
    pub fn new(params: &NewEventParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organizer_id: params.organizer_id.clone(),
            title: params.title.clone(),
            description: params.description.clone(),
            venue: params.venue.clone(),
            start_time: params.start_time,
            end_time: params.end_time,
            base_price_cents: params.base_price_cents,
            status: EventStatus::Draft,
            created_at: Utc::now(),
        }
    }
}

/// Event plus derived seat counts, for listings.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct EventWithInventory {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub total_seats: i64,
    pub available_seats: i64,
}
