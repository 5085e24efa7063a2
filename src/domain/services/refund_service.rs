use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::models::booking::BookingStatus;
use crate::domain::models::notification::Notification;
use crate::domain::models::refund::Refund;
use crate::domain::ports::{BookingRepository, EventRepository, Notifier, RefundRepository};
use crate::error::AppError;

pub struct RefundService {
    booking_repo: Arc<dyn BookingRepository>,
    refund_repo: Arc<dyn RefundRepository>,
    event_repo: Arc<dyn EventRepository>,
    notifier: Arc<dyn Notifier>,
}

impl RefundService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        refund_repo: Arc<dyn RefundRepository>,
        event_repo: Arc<dyn EventRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            booking_repo,
            refund_repo,
            event_repo,
            notifier,
        }
    }

    pub async fn request_refund(
        &self,
        booking_id: &str,
        customer_id: &str,
        reason: &str,
    ) -> Result<Refund, AppError> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;
        if booking.customer_id != customer_id {
            return Err(AppError::Validation(format!(
                "booking {} does not belong to customer {}",
                booking_id, customer_id
            )));
        }
        if booking.status != BookingStatus::Confirmed {
            return Err(AppError::BookingNotRefundable(format!(
                "booking {} is {:?}",
                booking_id, booking.status
            )));
        }
        if self.refund_repo.find_by_booking(booking_id).await?.is_some() {
            return Err(AppError::BookingNotRefundable(format!(
                "refund already exists for booking {}",
                booking_id
            )));
        }

        let refund = Refund::new(booking_id, reason, booking.total_cents, customer_id);
        let created = self.refund_repo.create_requested(&refund).await?;
        info!(booking_id = %booking_id, refund_id = %created.id, "Refund requested");
        Ok(created)
    }

    /// Approval invalidates the booking's tickets and frees its seats in
    /// one transaction; rejection puts the booking back to confirmed with
    /// nothing else touched.
    pub async fn decide(
        &self,
        booking_id: &str,
        approve: bool,
        decision_actor: &str,
    ) -> Result<Refund, AppError> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;
        if booking.status != BookingStatus::RefundRequested {
            return Err(AppError::BookingNotRefundable(format!(
                "booking {} is {:?}",
                booking_id, booking.status
            )));
        }

        let now = Utc::now();
        let refund = if approve {
            let refund = self.refund_repo.approve(booking_id, decision_actor, now).await?;
            self.event_repo.sync_sold_out(&booking.event_id).await?;
            info!(booking_id = %booking_id, "Refund approved; tickets invalidated and seats released");
            refund
        } else {
            let refund = self.refund_repo.reject(booking_id, decision_actor, now).await?;
            info!(booking_id = %booking_id, "Refund rejected; booking restored to confirmed");
            refund
        };

        self.dispatch(Notification::RefundDecided {
            booking_id: booking.id.clone(),
            customer_id: booking.customer_id.clone(),
            refund_id: refund.id.clone(),
            approved: approve,
            amount_cents: refund.amount_cents,
        })
        .await;

        Ok(refund)
    }

    pub async fn find_for_booking(&self, booking_id: &str) -> Result<Option<Refund>, AppError> {
        self.refund_repo.find_by_booking(booking_id).await
    }

    async fn dispatch(&self, notification: Notification) {
        if let Err(err) = self.notifier.notify(&notification).await {
            warn!("Notification delivery failed: {:?}", err);
        }
    }
}
