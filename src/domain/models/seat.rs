use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SeatState {
    Available,
    Held,
    Booked,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Seat {
    pub id: String,
    pub event_id: String,
    pub row_label: String,
    pub seat_number: i64,
    pub state: SeatState,
    pub hold_ref: Option<String>,
    pub price_override_cents: Option<i64>,
}

impl Seat {
    pub fn new(event_id: &str, row_label: &str, seat_number: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id: event_id.to_string(),
            row_label: row_label.to_string(),
            seat_number,
            state: SeatState::Available,
            hold_ref: None,
            price_override_cents: None,
        }
    }

    /// The seat grid created when an event is onboarded: `row_count` rows
    /// labelled "A".., `seats_per_row` seats each.
    pub fn block(event_id: &str, row_count: u32, seats_per_row: u32) -> Vec<Seat> {
        let mut seats = Vec::with_capacity((row_count * seats_per_row) as usize);
        for row_index in 0..row_count {
            let row_label = char::from(b'A' + row_index as u8).to_string();
            for seat_number in 1..=seats_per_row {
                seats.push(Seat::new(event_id, &row_label, seat_number as i64));
            }
        }
        seats
    }

    pub fn price_cents(&self, base_price_cents: i64) -> i64 {
        self.price_override_cents.unwrap_or(base_price_cents)
    }
}

/// Provisional, exclusive claim on a seat set, pending payment resolution.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SeatHold {
    pub reference: String,
    pub event_id: String,
    pub seat_ids: Vec<String>,
}

impl SeatHold {
    pub fn new(event_id: &str, seat_ids: Vec<String>) -> Self {
        Self {
            reference: Uuid::new_v4().to_string(),
            event_id: event_id.to_string(),
            seat_ids,
        }
    }
}
