use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::{
    BookingRepository, EventRepository, Notifier, OfferRepository, RefundRepository, SeatInventory,
    SupportTicketRepository, TicketRepository,
};
use crate::domain::services::booking_service::BookingService;
use crate::domain::services::event_service::EventService;
use crate::domain::services::payment_service::PaymentService;
use crate::domain::services::refund_service::RefundService;
use crate::domain::services::support_service::SupportService;
use crate::domain::services::ticket_service::TicketService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub seat_inventory: Arc<dyn SeatInventory>,
    pub offer_repo: Arc<dyn OfferRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub ticket_repo: Arc<dyn TicketRepository>,
    pub refund_repo: Arc<dyn RefundRepository>,
    pub support_repo: Arc<dyn SupportTicketRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub event_service: Arc<EventService>,
    pub booking_service: Arc<BookingService>,
    pub payment_service: Arc<PaymentService>,
    pub ticket_service: Arc<TicketService>,
    pub refund_service: Arc<RefundService>,
    pub support_service: Arc<SupportService>,
}
