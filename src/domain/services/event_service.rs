use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::models::event::{Event, EventStatus, EventWithInventory, NewEventParams};
use crate::domain::models::notification::Notification;
use crate::domain::models::seat::Seat;
use crate::domain::ports::{BookingRepository, EventRepository, Notifier, SeatInventory};
use crate::error::AppError;

pub struct EventService {
    event_repo: Arc<dyn EventRepository>,
    inventory: Arc<dyn SeatInventory>,
    booking_repo: Arc<dyn BookingRepository>,
    notifier: Arc<dyn Notifier>,
}

impl EventService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        inventory: Arc<dyn SeatInventory>,
        booking_repo: Arc<dyn BookingRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            event_repo,
            inventory,
            booking_repo,
            notifier,
        }
    }

    /// Onboarding entry point: creates the draft event, then seeds its seat
    /// grid through the inventory, rows labelled "A" onward. The event only
    /// becomes bookable once published.
    pub async fn create_event(&self, params: NewEventParams) -> Result<Event, AppError> {
        if params.end_time <= params.start_time {
            return Err(AppError::Validation("end_time must be after start_time".to_string()));
        }
        if params.row_count == 0 || params.seats_per_row == 0 {
            return Err(AppError::Validation("seat grid must not be empty".to_string()));
        }
        if params.row_count > 26 {
            return Err(AppError::Validation("row_count must be at most 26".to_string()));
        }
        let event = Event::new(&params);
        let created = self.event_repo.create(&event).await?;
        let seats = Seat::block(&created.id, params.row_count, params.seats_per_row);
        self.inventory.bulk_create(&seats).await?;
        info!(event_id = %created.id, seats = seats.len(), "Event onboarded");
        Ok(created)
    }

    pub async fn update_status(&self, event_id: &str, new_status: EventStatus) -> Result<Event, AppError> {
        let event = self
            .event_repo
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;
        if event.status == new_status {
            return Ok(event);
        }
        if !event.status.can_transition(new_status) {
            return Err(AppError::InvalidTransition(format!(
                "event {}: {:?} -> {:?}",
                event_id, event.status, new_status
            )));
        }
        if !self.event_repo.set_status(event_id, event.status, new_status).await? {
            return Err(AppError::ConcurrentConflict(format!(
                "event {} status changed concurrently",
                event_id
            )));
        }

        if new_status == EventStatus::Cancelled {
            self.cancel_active_bookings(event_id).await?;
        }

        self.dispatch(Notification::EventStatusChanged {
            event_id: event_id.to_string(),
            old_status: event.status,
            new_status,
        })
        .await;

        self.event_repo
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))
    }

    /// Cancellation cascade: each active booking is cancelled in its own
    /// compensating transaction, so a partial failure leaves an auditable
    /// prefix that a re-run completes.
    async fn cancel_active_bookings(&self, event_id: &str) -> Result<(), AppError> {
        let active = self.booking_repo.find_active_by_event(event_id).await?;
        let mut cancelled = 0;
        for booking in &active {
            if self.booking_repo.cancel_active(&booking.id).await? {
                cancelled += 1;
            }
        }
        info!(
            event_id = %event_id,
            bookings = cancelled,
            "Event cancelled; active bookings cancelled and seats released"
        );
        Ok(())
    }

    /// Re-derives sold_out from seat availability.
    pub async fn refresh_sold_out(&self, event_id: &str) -> Result<(), AppError> {
        self.event_repo.sync_sold_out(event_id).await
    }

    pub async fn find_event(&self, event_id: &str) -> Result<Option<Event>, AppError> {
        self.event_repo.find_by_id(event_id).await
    }

    pub async fn list_events(&self) -> Result<Vec<EventWithInventory>, AppError> {
        self.event_repo.list_with_inventory().await
    }

    pub async fn list_seats(&self, event_id: &str) -> Result<Vec<Seat>, AppError> {
        self.inventory.list_by_event(event_id).await
    }

    async fn dispatch(&self, notification: Notification) {
        if let Err(err) = self.notifier.notify(&notification).await {
            warn!("Notification delivery failed: {:?}", err);
        }
    }
}
