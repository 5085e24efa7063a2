use crate::domain::models::booking::{Booking, BookingSeat};
use crate::domain::models::payment::Payment;
use crate::domain::models::ticket::Ticket;
use crate::domain::ports::BookingRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Shared cancel transaction: the caller supplies the status-guarded
    /// UPDATE, the rest (ticket invalidation, seat release) is identical.
    async fn cancel_tx(&self, booking_id: &str, cancel_sql: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query(cancel_sql)
            .bind(Utc::now())
            .bind(booking_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(AppError::Database)?;
            return Ok(false);
        }
        sqlx::query(
            "UPDATE tickets SET status = 'invalidated'
             WHERE status = 'issued' AND booking_seat_id IN (SELECT id FROM booking_seats WHERE booking_id = ?)"
        )
            .bind(booking_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query(
            "UPDATE seats SET state = 'available', hold_ref = NULL
             WHERE id IN (SELECT seat_id FROM booking_seats WHERE booking_id = ?)"
        )
            .bind(booking_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(true)
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_pending(&self, booking: &Booking, links: &[BookingSeat], offer_code: Option<&str>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        if let Some(code) = offer_code {
            // Conditional increment keeps the cap authoritative under
            // concurrent redemption; a lost race rolls the booking back.
            let result = sqlx::query(
                "UPDATE offers SET used_count = used_count + 1
                 WHERE code = ? AND active = 1 AND (usage_limit IS NULL OR used_count < usage_limit)"
            )
                .bind(code)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
            if result.rows_affected() == 0 {
                return Err(AppError::OfferExhausted);
            }
        }
        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, customer_id, event_id, status, subtotal_cents, discount_cents, tax_cents, total_cents, offer_code, hold_ref, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.customer_id).bind(&booking.event_id).bind(booking.status)
            .bind(booking.subtotal_cents).bind(booking.discount_cents).bind(booking.tax_cents).bind(booking.total_cents)
            .bind(&booking.offer_code).bind(&booking.hold_ref).bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for link in links {
            sqlx::query("INSERT INTO booking_seats (id, booking_id, seat_id, ticket_price_cents) VALUES (?, ?, ?, ?)")
                .bind(&link.id).bind(&link.booking_id).bind(&link.seat_id).bind(link.ticket_price_cents)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_links(&self, booking_id: &str) -> Result<Vec<BookingSeat>, AppError> {
        sqlx::query_as::<_, BookingSeat>("SELECT * FROM booking_seats WHERE booking_id = ?")
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE event_id = ? ORDER BY created_at ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE customer_id = ? ORDER BY created_at DESC")
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_active_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE event_id = ? AND status IN ('pending_payment', 'confirmed', 'refund_requested')"
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_expired_pending(&self, cutoff: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE status = 'pending_payment' AND created_at <= ?"
        )
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn record_settlement(&self, booking_id: &str, payment: &Payment, tickets: &[Ticket]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query(
            "UPDATE bookings SET status = 'confirmed', hold_ref = NULL, updated_at = ? WHERE id = ? AND status = 'pending_payment'"
        )
            .bind(Utc::now())
            .bind(booking_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::BookingNotPayable(booking_id.to_string()));
        }
        sqlx::query(
            "INSERT INTO payments (id, booking_id, amount_cents, status, method, transaction_ref, settled_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&payment.id).bind(&payment.booking_id).bind(payment.amount_cents).bind(payment.status)
            .bind(&payment.method).bind(&payment.transaction_ref).bind(payment.settled_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        for ticket in tickets {
            sqlx::query(
                "INSERT INTO tickets (id, booking_seat_id, qr_code, status, validated_at, validated_by) VALUES (?, ?, ?, ?, ?, ?)"
            )
                .bind(&ticket.id).bind(&ticket.booking_seat_id).bind(&ticket.qr_code).bind(ticket.status)
                .bind(ticket.validated_at).bind(&ticket.validated_by)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn record_failed_settlement(&self, booking_id: &str, payment: &Payment) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query(
            "UPDATE bookings SET status = 'cancelled', hold_ref = NULL, updated_at = ? WHERE id = ? AND status = 'pending_payment'"
        )
            .bind(Utc::now())
            .bind(booking_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::BookingNotPayable(booking_id.to_string()));
        }
        sqlx::query(
            "INSERT INTO payments (id, booking_id, amount_cents, status, method, transaction_ref, settled_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&payment.id).bind(&payment.booking_id).bind(payment.amount_cents).bind(payment.status)
            .bind(&payment.method).bind(&payment.transaction_ref).bind(payment.settled_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn cancel_active(&self, booking_id: &str) -> Result<bool, AppError> {
        self.cancel_tx(
            booking_id,
            "UPDATE bookings SET status = 'cancelled', hold_ref = NULL, updated_at = ?
             WHERE id = ? AND status IN ('pending_payment', 'confirmed', 'refund_requested')",
        )
        .await
    }

    async fn expire_pending(&self, booking_id: &str) -> Result<bool, AppError> {
        self.cancel_tx(
            booking_id,
            "UPDATE bookings SET status = 'cancelled', hold_ref = NULL, updated_at = ?
             WHERE id = ? AND status = 'pending_payment'",
        )
        .await
    }

    async fn find_payment(&self, booking_id: &str) -> Result<Option<Payment>, AppError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE booking_id = ?")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
