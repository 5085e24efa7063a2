use crate::domain::models::event::{Event, EventStatus, EventWithInventory};
use crate::domain::ports::EventRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, organizer_id, title, description, venue, start_time, end_time, base_price_cents, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&event.id).bind(&event.organizer_id).bind(&event.title).bind(&event.description)
            .bind(&event.venue).bind(event.start_time).bind(event.end_time).bind(event.base_price_cents)
            .bind(event.status).bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_with_inventory(&self) -> Result<Vec<EventWithInventory>, AppError> {
        sqlx::query_as::<_, EventWithInventory>(
            "SELECT e.*,
                    COUNT(s.id) AS total_seats,
                    COALESCE(SUM(CASE WHEN s.state = 'available' THEN 1 ELSE 0 END), 0) AS available_seats
             FROM events e
             LEFT JOIN seats s ON s.event_id = e.id
             GROUP BY e.id
             ORDER BY e.start_time ASC"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_status(&self, event_id: &str, from: EventStatus, to: EventStatus) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE events SET status = ? WHERE id = ? AND status = ?")
            .bind(to)
            .bind(event_id)
            .bind(from)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn sync_sold_out(&self, event_id: &str) -> Result<(), AppError> {
        // Each statement checks availability and flips in one atomic step,
        // so a stale count can never be written.
        sqlx::query(
            "UPDATE events SET status = 'sold_out'
             WHERE id = ? AND status = 'published'
             AND NOT EXISTS (SELECT 1 FROM seats WHERE event_id = events.id AND state = 'available')"
        )
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        sqlx::query(
            "UPDATE events SET status = 'published'
             WHERE id = ? AND status = 'sold_out'
             AND EXISTS (SELECT 1 FROM seats WHERE event_id = events.id AND state = 'available')"
        )
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
