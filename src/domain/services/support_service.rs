use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::models::support::{NewComplaintParams, SupportStatus, SupportTicket};
use crate::domain::ports::{BookingRepository, EventRepository, SupportTicketRepository};
use crate::error::AppError;

/// Complaint tracking. No seat or booking side effects; actor authorization
/// is the auth collaborator's job, the engine records actor ids only.
pub struct SupportService {
    support_repo: Arc<dyn SupportTicketRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    event_repo: Arc<dyn EventRepository>,
}

impl SupportService {
    pub fn new(
        support_repo: Arc<dyn SupportTicketRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        event_repo: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            support_repo,
            booking_repo,
            event_repo,
        }
    }

    pub async fn open_ticket(&self, params: NewComplaintParams) -> Result<SupportTicket, AppError> {
        if let Some(booking_id) = &params.booking_id {
            let booking = self
                .booking_repo
                .find_by_id(booking_id)
                .await?
                .ok_or_else(|| AppError::Validation("invalid booking for complaint".to_string()))?;
            if booking.customer_id != params.customer_id {
                return Err(AppError::Validation("invalid booking for complaint".to_string()));
            }
        }
        if let Some(event_id) = &params.event_id {
            if self.event_repo.find_by_id(event_id).await?.is_none() {
                return Err(AppError::Validation("invalid event for complaint".to_string()));
            }
        }
        let created = self.support_repo.create(&SupportTicket::new(params)).await?;
        info!(ticket_id = %created.id, "Support ticket opened");
        Ok(created)
    }

    pub async fn update_ticket(
        &self,
        ticket_id: &str,
        actor: &str,
        new_status: SupportStatus,
        resolution: Option<String>,
    ) -> Result<SupportTicket, AppError> {
        let mut ticket = self
            .support_repo
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Support ticket {} not found", ticket_id)))?;
        if ticket.status != new_status {
            if !ticket.status.can_transition(new_status) {
                return Err(AppError::InvalidTransition(format!(
                    "support ticket {}: {:?} -> {:?}",
                    ticket_id, ticket.status, new_status
                )));
            }
            ticket.status = new_status;
        }
        ticket.assigned_to = Some(actor.to_string());
        if resolution.is_some() {
            ticket.resolution = resolution;
        }
        ticket.updated_at = Utc::now();
        self.support_repo.update(&ticket).await
    }

    pub async fn find_ticket(&self, ticket_id: &str) -> Result<Option<SupportTicket>, AppError> {
        self.support_repo.find_by_id(ticket_id).await
    }

    pub async fn list_by_status(&self, status: SupportStatus) -> Result<Vec<SupportTicket>, AppError> {
        self.support_repo.list_by_status(status).await
    }
}
