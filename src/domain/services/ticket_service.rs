use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::models::booking::BookingStatus;
use crate::domain::models::event::EventStatus;
use crate::domain::models::ticket::{GateReceipt, Ticket, TicketStatus};
use crate::domain::ports::{EventRepository, TicketRepository};
use crate::error::AppError;

/// Entry-gate validation. Consuming a ticket is a compare-and-swap on the
/// issued status, so concurrent scans of one code admit exactly one person.
pub struct TicketService {
    ticket_repo: Arc<dyn TicketRepository>,
    event_repo: Arc<dyn EventRepository>,
}

impl TicketService {
    pub fn new(ticket_repo: Arc<dyn TicketRepository>, event_repo: Arc<dyn EventRepository>) -> Self {
        Self {
            ticket_repo,
            event_repo,
        }
    }

    pub async fn validate(&self, qr_code: &str, validated_by: &str) -> Result<GateReceipt, AppError> {
        let ticket = self
            .ticket_repo
            .find_by_code(qr_code)
            .await?
            .ok_or(AppError::TicketNotFound)?;
        match ticket.status {
            TicketStatus::Used => return Err(AppError::TicketAlreadyUsed(ticket.validated_at)),
            TicketStatus::Invalidated => return Err(AppError::TicketInvalidated),
            TicketStatus::Issued => {}
        }

        let booking = self
            .ticket_repo
            .booking_for_ticket(&ticket.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking for ticket {} not found", ticket.id)))?;
        if booking.status != BookingStatus::Confirmed {
            return Err(AppError::TicketInvalidated);
        }
        let event = self
            .event_repo
            .find_by_id(&booking.event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", booking.event_id)))?;
        if event.status == EventStatus::Cancelled {
            return Err(AppError::TicketInvalidated);
        }

        if !self.ticket_repo.mark_used(&ticket.id, validated_by, Utc::now()).await? {
            // Lost the race to another gate; re-read once and report the
            // terminal state instead of a bare conflict.
            let current = self
                .ticket_repo
                .find_by_code(qr_code)
                .await?
                .ok_or(AppError::TicketNotFound)?;
            return Err(match current.status {
                TicketStatus::Used => AppError::TicketAlreadyUsed(current.validated_at),
                TicketStatus::Invalidated => AppError::TicketInvalidated,
                TicketStatus::Issued => AppError::ConcurrentConflict(format!("ticket {}", ticket.id)),
            });
        }

        info!(qr_code = %qr_code, validated_by = %validated_by, "Ticket admitted");
        self.ticket_repo.gate_receipt(&ticket.id).await
    }

    pub async fn find_by_code(&self, qr_code: &str) -> Result<Option<Ticket>, AppError> {
        self.ticket_repo.find_by_code(qr_code).await
    }

    pub async fn list_for_booking(&self, booking_id: &str) -> Result<Vec<Ticket>, AppError> {
        self.ticket_repo.list_by_booking(booking_id).await
    }
}
