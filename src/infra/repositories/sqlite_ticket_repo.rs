use crate::domain::models::booking::Booking;
use crate::domain::models::ticket::{GateReceipt, Ticket};
use crate::domain::ports::TicketRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteTicketRepo {
    pool: SqlitePool,
}

impl SqliteTicketRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for SqliteTicketRepo {
    async fn find_by_code(&self, qr_code: &str) -> Result<Option<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE qr_code = ?")
            .bind(qr_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_used(&self, ticket_id: &str, validated_by: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE tickets SET status = 'used', validated_at = ?, validated_by = ? WHERE id = ? AND status = 'issued'"
        )
            .bind(at)
            .bind(validated_by)
            .bind(ticket_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_booking(&self, booking_id: &str) -> Result<Vec<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>(
            "SELECT t.* FROM tickets t
             JOIN booking_seats bs ON bs.id = t.booking_seat_id
             WHERE bs.booking_id = ?"
        )
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn booking_for_ticket(&self, ticket_id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT b.* FROM bookings b
             JOIN booking_seats bs ON bs.booking_id = b.id
             JOIN tickets t ON t.booking_seat_id = bs.id
             WHERE t.id = ?"
        )
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn gate_receipt(&self, ticket_id: &str) -> Result<GateReceipt, AppError> {
        sqlx::query_as::<_, GateReceipt>(
            "SELECT t.id AS ticket_id, t.qr_code, e.id AS event_id, e.title AS event_title,
                    s.row_label, s.seat_number, t.validated_at
             FROM tickets t
             JOIN booking_seats bs ON bs.id = t.booking_seat_id
             JOIN seats s ON s.id = bs.seat_id
             JOIN events e ON e.id = s.event_id
             WHERE t.id = ?"
        )
            .bind(ticket_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
