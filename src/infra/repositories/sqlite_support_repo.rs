use crate::domain::models::support::{SupportStatus, SupportTicket};
use crate::domain::ports::SupportTicketRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteSupportRepo {
    pool: SqlitePool,
}

impl SqliteSupportRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupportTicketRepository for SqliteSupportRepo {
    async fn create(&self, ticket: &SupportTicket) -> Result<SupportTicket, AppError> {
        sqlx::query_as::<_, SupportTicket>(
            "INSERT INTO support_tickets (id, customer_id, booking_id, event_id, subject, description, status, assigned_to, resolution, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&ticket.id).bind(&ticket.customer_id).bind(&ticket.booking_id).bind(&ticket.event_id)
            .bind(&ticket.subject).bind(&ticket.description).bind(ticket.status).bind(&ticket.assigned_to)
            .bind(&ticket.resolution).bind(ticket.created_at).bind(ticket.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<SupportTicket>, AppError> {
        sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, ticket: &SupportTicket) -> Result<SupportTicket, AppError> {
        sqlx::query_as::<_, SupportTicket>(
            "UPDATE support_tickets SET status = ?, assigned_to = ?, resolution = ?, updated_at = ?
             WHERE id = ?
             RETURNING *"
        )
            .bind(ticket.status).bind(&ticket.assigned_to).bind(&ticket.resolution).bind(ticket.updated_at)
            .bind(&ticket.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_status(&self, status: SupportStatus) -> Result<Vec<SupportTicket>, AppError> {
        sqlx::query_as::<_, SupportTicket>(
            "SELECT * FROM support_tickets WHERE status = ? ORDER BY created_at ASC"
        )
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
