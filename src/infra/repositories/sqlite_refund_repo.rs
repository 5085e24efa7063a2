use crate::domain::models::refund::Refund;
use crate::domain::ports::RefundRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteRefundRepo {
    pool: SqlitePool,
}

impl SqliteRefundRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefundRepository for SqliteRefundRepo {
    async fn create_requested(&self, refund: &Refund) -> Result<Refund, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query(
            "UPDATE bookings SET status = 'refund_requested', updated_at = ? WHERE id = ? AND status = 'confirmed'"
        )
            .bind(Utc::now())
            .bind(&refund.booking_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::BookingNotRefundable(refund.booking_id.clone()));
        }
        let created = sqlx::query_as::<_, Refund>(
            "INSERT INTO refunds (id, booking_id, status, reason, amount_cents, requested_by, resolved_by, resolved_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&refund.id).bind(&refund.booking_id).bind(refund.status).bind(&refund.reason)
            .bind(refund.amount_cents).bind(&refund.requested_by).bind(&refund.resolved_by)
            .bind(refund.resolved_at).bind(refund.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_booking(&self, booking_id: &str) -> Result<Option<Refund>, AppError> {
        sqlx::query_as::<_, Refund>("SELECT * FROM refunds WHERE booking_id = ?")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn approve(&self, booking_id: &str, resolved_by: &str, at: DateTime<Utc>) -> Result<Refund, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let updated = sqlx::query_as::<_, Refund>(
            "UPDATE refunds SET status = 'completed', resolved_by = ?, resolved_at = ?
             WHERE booking_id = ? AND status = 'requested'
             RETURNING *"
        )
            .bind(resolved_by)
            .bind(at)
            .bind(booking_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::BookingNotRefundable(booking_id.to_string()))?;

        let result = sqlx::query(
            "UPDATE bookings SET status = 'refunded', updated_at = ? WHERE id = ? AND status = 'refund_requested'"
        )
            .bind(at)
            .bind(booking_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::ConcurrentConflict(format!("booking {} left refund_requested during approval", booking_id)));
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
        sqlx::query("UPDATE payments SET status = 'refunded' WHERE booking_id = ? AND status = 'paid'")
            .bind(booking_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn reject(&self, booking_id: &str, resolved_by: &str, at: DateTime<Utc>) -> Result<Refund, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let updated = sqlx::query_as::<_, Refund>(
            "UPDATE refunds SET status = 'rejected', resolved_by = ?, resolved_at = ?
             WHERE booking_id = ? AND status = 'requested'
             RETURNING *"
        )
            .bind(resolved_by)
            .bind(at)
            .bind(booking_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::BookingNotRefundable(booking_id.to_string()))?;

        let result = sqlx::query(
            "UPDATE bookings SET status = 'confirmed', updated_at = ? WHERE id = ? AND status = 'refund_requested'"
        )
            .bind(at)
            .bind(booking_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::ConcurrentConflict(format!("booking {} left refund_requested during rejection", booking_id)));
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
}
