use std::collections::HashMap;

use crate::domain::models::seat::{Seat, SeatHold, SeatState};
use crate::domain::ports::SeatInventory;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteSeatRepo {
    pool: SqlitePool,
}

impl SqliteSeatRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn placeholders(n: usize) -> String {
        vec!["?"; n].join(", ")
    }

    /// One conditional UPDATE covering the whole seat set. Succeeds only if
    /// every requested seat was still available; otherwise rolls back.
    async fn try_hold(&self, event_id: &str, seat_ids: &[String], hold_ref: &str) -> Result<bool, AppError> {
        let sql = format!(
            "UPDATE seats SET state = 'held', hold_ref = ? WHERE event_id = ? AND state = 'available' AND id IN ({})",
            Self::placeholders(seat_ids.len())
        );
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut query = sqlx::query(&sql).bind(hold_ref).bind(event_id);
        for id in seat_ids {
            query = query.bind(id);
        }
        let result = query.execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() as usize == seat_ids.len() {
            tx.commit().await.map_err(AppError::Database)?;
            Ok(true)
        } else {
            tx.rollback().await.map_err(AppError::Database)?;
            Ok(false)
        }
    }

    /// Seat ids from the request that are missing, foreign to the event, or
    /// not currently available.
    async fn conflicting(&self, event_id: &str, seat_ids: &[String]) -> Result<Vec<String>, AppError> {
        let sql = format!(
            "SELECT * FROM seats WHERE id IN ({})",
            Self::placeholders(seat_ids.len())
        );
        let mut query = sqlx::query_as::<_, Seat>(&sql);
        for id in seat_ids {
            query = query.bind(id);
        }
        let found: HashMap<String, Seat> = query
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?
            .into_iter()
            .map(|seat| (seat.id.clone(), seat))
            .collect();

        let mut conflicts = Vec::new();
        for id in seat_ids {
            match found.get(id) {
                Some(seat) if seat.event_id == event_id && seat.state == SeatState::Available => {}
                _ => conflicts.push(id.clone()),
            }
        }
        Ok(conflicts)
    }
}

#[async_trait]
impl SeatInventory for SqliteSeatRepo {
    async fn bulk_create(&self, seats: &[Seat]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        for seat in seats {
            sqlx::query(
                "INSERT INTO seats (id, event_id, row_label, seat_number, state, hold_ref, price_override_cents) VALUES (?, ?, ?, ?, ?, ?, ?)"
            )
                .bind(&seat.id).bind(&seat.event_id).bind(&seat.row_label).bind(seat.seat_number)
                .bind(seat.state).bind(&seat.hold_ref).bind(seat.price_override_cents)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn hold(&self, event_id: &str, seat_ids: &[String]) -> Result<SeatHold, AppError> {
        if seat_ids.is_empty() {
            return Err(AppError::InvalidSeatSelection("no seats requested".to_string()));
        }
        let hold = SeatHold::new(event_id, seat_ids.to_vec());
        for _ in 0..2 {
            if self.try_hold(event_id, seat_ids, &hold.reference).await? {
                return Ok(hold);
            }
            let conflicts = self.conflicting(event_id, seat_ids).await?;
            if !conflicts.is_empty() {
                return Err(AppError::SeatsUnavailable(conflicts));
            }
            // No conflicting seat on re-check: we lost a transient race
            // against a concurrent release. One retry, then give up.
        }
        Err(AppError::ConcurrentConflict(format!("seat hold on event {}", event_id)))
    }

    async fn confirm(&self, hold_ref: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE seats SET state = 'booked', hold_ref = NULL WHERE hold_ref = ? AND state = 'held'")
            .bind(hold_ref)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::HoldNotFound(hold_ref.to_string()));
        }
        Ok(())
    }

    async fn release_hold(&self, hold_ref: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE seats SET state = 'available', hold_ref = NULL WHERE hold_ref = ?")
            .bind(hold_ref)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn release_seats(&self, seat_ids: &[String]) -> Result<(), AppError> {
        if seat_ids.is_empty() {
            return Ok(());
        }
        let sql = format!(
            "UPDATE seats SET state = 'available', hold_ref = NULL WHERE id IN ({})",
            Self::placeholders(seat_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in seat_ids {
            query = query.bind(id);
        }
        query.execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_by_ids(&self, seat_ids: &[String]) -> Result<Vec<Seat>, AppError> {
        if seat_ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!(
            "SELECT * FROM seats WHERE id IN ({})",
            Self::placeholders(seat_ids.len())
        );
        let mut query = sqlx::query_as::<_, Seat>(&sql);
        for id in seat_ids {
            query = query.bind(id);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Seat>, AppError> {
        sqlx::query_as::<_, Seat>("SELECT * FROM seats WHERE event_id = ? ORDER BY row_label, seat_number")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_available(&self, event_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seats WHERE event_id = ? AND state = 'available'")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(count)
    }
}
